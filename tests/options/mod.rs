//! Option kinds and the whole-registry codec

pub mod codec_test;
pub mod kinds_test;
