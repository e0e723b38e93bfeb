//! Fixed capacities of the pipeline's tables, stacks and buffers

/// Number of light slots
pub const MAX_LIGHTS: usize = 32;

/// Model-view matrix stack depth
pub const MAX_MODELVIEW_STACK_DEPTH: usize = 35;
/// Projection matrix stack depth
pub const MAX_PROJECTION_STACK_DEPTH: usize = 8;
/// Texture matrix stack depth
pub const MAX_TEXTURE_STACK_DEPTH: usize = 8;
/// Selection name stack depth
pub const MAX_NAME_STACK_DEPTH: usize = 64;

/// Mipmap levels per texture object
pub const MAX_TEXTURE_LEVELS: usize = 11;
/// Bucket count of the texture hash table
pub const TEXTURE_HASH_TABLE_SIZE: usize = 256;

/// Default size of the specular table pool
pub const MAX_SPECULAR_BUFFERS: usize = 8;
/// Samples in a specular table, excluding the closing sample at cos = 1
pub const SPECULAR_BUFFER_SIZE: usize = 1024;
/// Shininess quantization steps over the `[0, 128]` range
pub const SPECULAR_BUFFER_RESOLUTION: usize = 1024;

/// Display-list name space
pub const MAX_DISPLAY_LISTS: usize = 1024;
/// Parameter slots per display-list buffer
pub const OP_BUFFER_MAX_SIZE: usize = 512;

/// Vertices kept while assembling a polygon before the buffer grows
pub const POLYGON_MAX_VERTEX: usize = 16;

/// Relative slack applied to `w` when computing clip codes
pub const CLIP_EPSILON: f32 = 1e-5;
