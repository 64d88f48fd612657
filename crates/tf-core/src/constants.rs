/// Embedding dimensionality used by the synthetic embedder and the memory store.
pub const EMBEDDING_DIM: usize = 384;

/// Context window ceiling. Crossing it triggers eviction.
pub const WINDOW_CAPACITY: usize = 100;

/// Entries kept after an eviction pass (oldest `len - WINDOW_RETAIN` are dropped).
pub const WINDOW_RETAIN: usize = 50;

/// Minimum cosine similarity (exclusive) for a retrieval hit.
pub const RETRIEVAL_THRESHOLD: f64 = 0.7;

/// Default number of retrieval hits.
pub const MAX_RESULTS: usize = 5;

/// Complexity bounds for path-derived intents.
pub const MIN_COMPLEXITY: u8 = 1;
pub const MAX_COMPLEXITY: u8 = 10;

/// Starting complexity for both the path parser and the request classifier.
pub const BASE_COMPLEXITY: u8 = 5;

/// Default tensor shape. Element count is the product and stays fixed
/// across dtype conversions.
pub const TENSOR_SHAPE: [usize; 2] = [64, 64];

/// Max representable values used by the dtype conversion table.
pub const U8_MAX: f32 = 255.0;
pub const U16_MAX: f32 = 65535.0;

/// 8 <-> 16 bit direct conversion ratio (255 * 257 = 65535).
pub const U8_U16_RATIO: u16 = 257;

/// Free-text requests longer than this are normalized to the default intent.
pub const MAX_INTENT_CHARS: usize = 8192;

/// Trait threshold that switches the direct-response template.
pub const TRAIT_EMPHASIS: f64 = 0.7;

/// Requests must exceed this complexity before a spawn is considered.
pub const SPAWN_COMPLEXITY: u8 = 6;

/// Upper bound on a single creativity/precision adjustment. The adaptation
/// rate itself grows without a ceiling.
pub const MAX_TRAIT_STEP: f64 = 1.0;

/// Floor for the advisory activation level in reshape suggestions.
pub const ACTIVATION_FLOOR: usize = 32;
