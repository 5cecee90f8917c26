//! Image safety gate
//!
//! An image is unsafe when any blocked class scores at or above the
//! threshold. A missing image is safe; an image that cannot be decoded or
//! classified is an error, never a pass.

use image::{imageops::FilterType, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Default probability at which a blocked class makes an image unsafe
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Side length of the square RGB input handed to classifiers
pub const MODEL_INPUT_SIZE: u32 = 224;

/// Default maximum upload size (10MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 10_000_000;

/// Errors that can occur while checking an image
#[derive(Debug, Error)]
pub enum ImageSafetyError {
    /// Image decoding error
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The classifier model could not be loaded
    #[error("Image classifier unavailable: {0}")]
    ModelUnavailable(String),

    /// The classifier failed on this image
    #[error("Image classification failed: {0}")]
    Classification(String),

    /// Threshold outside 0.0..=1.0
    #[error("Invalid threshold {0}: must be between 0.0 and 1.0")]
    InvalidThreshold(f32),

    /// File too large
    #[error("File size {size} exceeds maximum {max}")]
    FileTooLarge {
        /// Actual file size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

/// Result type for image safety checks
pub type Result<T> = std::result::Result<T, ImageSafetyError>;

/// Classes produced by the content classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NsfwClass {
    /// Illustrations and drawings
    Drawing,
    /// Explicit illustrations
    Hentai,
    /// Safe content
    Neutral,
    /// Explicit photos
    Porn,
    /// Suggestive content
    Sexy,
    /// Violent content
    Violence,
}

impl NsfwClass {
    /// Every class
    pub const ALL: [NsfwClass; 6] = [
        NsfwClass::Drawing,
        NsfwClass::Hentai,
        NsfwClass::Neutral,
        NsfwClass::Porn,
        NsfwClass::Sexy,
        NsfwClass::Violence,
    ];

    /// The label the model uses for this class
    pub fn label(&self) -> &'static str {
        match self {
            NsfwClass::Drawing => "Drawing",
            NsfwClass::Hentai => "Hentai",
            NsfwClass::Neutral => "Neutral",
            NsfwClass::Porn => "Porn",
            NsfwClass::Sexy => "Sexy",
            NsfwClass::Violence => "Violence",
        }
    }

    /// Classes that block publication by default
    pub fn default_blocked() -> HashSet<NsfwClass> {
        [
            NsfwClass::Porn,
            NsfwClass::Hentai,
            NsfwClass::Sexy,
            NsfwClass::Violence,
        ]
        .into_iter()
        .collect()
    }
}

impl FromStr for NsfwClass {
    type Err = ImageSafetyError;

    fn from_str(label: &str) -> Result<Self> {
        NsfwClass::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| ImageSafetyError::Classification(format!("unknown class label {:?}", label)))
    }
}

impl std::fmt::Display for NsfwClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One class score from the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The class
    pub class: NsfwClass,
    /// Probability in 0.0..=1.0
    pub probability: f32,
}

impl Prediction {
    /// Create a prediction
    pub fn new(class: NsfwClass, probability: f32) -> Self {
        Self { class, probability }
    }
}

/// A model that scores an image against [`NsfwClass`]
///
/// Implementations receive a `MODEL_INPUT_SIZE` square RGB image.
pub trait ImageClassifier: Send + Sync {
    /// Score the image
    fn classify(&self, input: &RgbImage) -> Result<Vec<Prediction>>;
}

type Loader = Box<dyn Fn() -> Result<Arc<dyn ImageClassifier>> + Send + Sync>;

/// A classifier loaded on first use and shared afterwards
///
/// A failed load is reported as `ModelUnavailable` and retried on the next
/// call.
pub struct LazyClassifier {
    loader: Loader,
    model: OnceLock<Arc<dyn ImageClassifier>>,
}

impl LazyClassifier {
    /// Create a lazily loaded classifier
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ImageClassifier>> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            model: OnceLock::new(),
        }
    }

    /// Whether the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    fn model(&self) -> Result<&Arc<dyn ImageClassifier>> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let loaded = (self.loader)().map_err(|e| match e {
            ImageSafetyError::ModelUnavailable(msg) => ImageSafetyError::ModelUnavailable(msg),
            other => ImageSafetyError::ModelUnavailable(other.to_string()),
        })?;

        // A concurrent caller may have won the race; either model is fine
        let _ = self.model.set(loaded);
        self.model
            .get()
            .ok_or_else(|| ImageSafetyError::ModelUnavailable("model was not stored".to_string()))
    }
}

impl std::fmt::Debug for LazyClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyClassifier")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl ImageClassifier for LazyClassifier {
    fn classify(&self, input: &RgbImage) -> Result<Vec<Prediction>> {
        self.model()?.classify(input)
    }
}

/// Policy for the image gate
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyOptions {
    /// Probability at which a blocked class makes an image unsafe
    pub threshold: f32,
    /// Classes that block publication
    pub blocked_classes: HashSet<NsfwClass>,
    /// Maximum accepted upload size in bytes
    pub max_file_size: usize,
}

impl Default for SafetyOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            blocked_classes: NsfwClass::default_blocked(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl SafetyOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold
    pub fn with_threshold(mut self, threshold: f32) -> Result<Self> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    /// Replace the blocked classes
    pub fn with_blocked_classes(mut self, classes: impl IntoIterator<Item = NsfwClass>) -> Self {
        self.blocked_classes = classes.into_iter().collect();
        self
    }

    /// Set the maximum upload size
    pub fn with_max_file_size(mut self, max: usize) -> Self {
        self.max_file_size = max;
        self
    }

    /// Whether these predictions make an image unsafe
    pub fn is_unsafe(&self, predictions: &[Prediction]) -> bool {
        predictions
            .iter()
            .any(|p| self.blocked_classes.contains(&p.class) && p.probability >= self.threshold)
    }
}

fn validate_threshold(threshold: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ImageSafetyError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Decode `bytes` and scale them to the classifier input
pub fn prepare_input(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageSafetyError::Decode(e.to_string()))?;
    Ok(img
        .resize_exact(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, FilterType::Triangle)
        .to_rgb8())
}

/// Checks uploads against a classifier and a [`SafetyOptions`] policy
#[derive(Clone)]
pub struct ImageSafetyChecker {
    classifier: Arc<dyn ImageClassifier>,
    options: SafetyOptions,
}

impl ImageSafetyChecker {
    /// Create a checker with default options
    pub fn new(classifier: Arc<dyn ImageClassifier>) -> Self {
        Self {
            classifier,
            options: SafetyOptions::default(),
        }
    }

    /// Create a checker with explicit options
    pub fn with_options(classifier: Arc<dyn ImageClassifier>, options: SafetyOptions) -> Result<Self> {
        validate_threshold(options.threshold)?;
        Ok(Self { classifier, options })
    }

    /// Current options
    pub fn options(&self) -> &SafetyOptions {
        &self.options
    }

    /// Check whether an upload may be published
    ///
    /// Empty input means no image is attached and is safe.
    pub fn is_image_safe(&self, bytes: &[u8]) -> Result<bool> {
        if bytes.is_empty() {
            return Ok(true);
        }
        if bytes.len() > self.options.max_file_size {
            return Err(ImageSafetyError::FileTooLarge {
                size: bytes.len(),
                max: self.options.max_file_size,
            });
        }

        let input = prepare_input(bytes)?;
        let predictions = self.classifier.classify(&input)?;
        let unsafe_image = self.options.is_unsafe(&predictions);

        if unsafe_image {
            tracing::info!(threshold = self.options.threshold, "image rejected by safety gate");
        }

        Ok(!unsafe_image)
    }

    /// Like [`is_image_safe`](Self::is_image_safe), on the blocking thread pool
    pub async fn is_image_safe_async(&self, bytes: Vec<u8>) -> Result<bool> {
        let checker = self.clone();
        tokio::task::spawn_blocking(move || checker.is_image_safe(&bytes))
            .await
            .map_err(|e| ImageSafetyError::Classification(format!("classification task failed: {}", e)))?
    }
}

impl std::fmt::Debug for ImageSafetyChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSafetyChecker")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
