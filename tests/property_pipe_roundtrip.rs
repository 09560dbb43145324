// tests/property_pipe_roundtrip.rs
#![cfg(unix)]

mod common;

use pipeworks::exec::{Input, exec_pipeline_capture_out};
use proptest::prelude::*;

use common::cmd;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever goes into `cat | cat` comes out byte for byte.
    #[test]
    fn pipe_preserves_bytes(payload in proptest::collection::vec(any::<u8>(), 0..150_000)) {
        let pipeline = vec![cmd("cat", &[]), cmd("cat", &[])];

        let (out, result) = exec_pipeline_capture_out(pipeline, Some(Input::bytes(payload.clone())));

        prop_assert!(result.is_ok(), "{:?}", result);
        prop_assert_eq!(out, payload);
    }

    /// A pipeline of n identity stages behaves like one.
    #[test]
    fn stage_count_does_not_change_output(
        stages in 1..6usize,
        text in "[a-z ]{0,64}",
    ) {
        let pipeline: Vec<_> = (0..stages).map(|_| cmd("cat", &[])).collect();

        let (out, result) = exec_pipeline_capture_out(pipeline, Some(Input::bytes(text.clone())));

        prop_assert!(result.is_ok(), "{:?}", result);
        prop_assert_eq!(out, text.into_bytes());
    }
}
