//! Media processing for Stellar Press
//!
//! This crate decides whether an uploaded image may be published. Images
//! are decoded and scaled to the model input size, then classified by a
//! pluggable [`ImageClassifier`]; the blocked-class and threshold policy
//! lives here rather than in the model.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod safety;

pub use safety::{
    ImageClassifier, ImageSafetyChecker, ImageSafetyError, LazyClassifier, NsfwClass, Prediction,
    Result, SafetyOptions, DEFAULT_THRESHOLD, MODEL_INPUT_SIZE,
};
