//! Block types and the block row codec for Blockpress.
//!
//! - [`BlockTypeRegistry`] maps a [`BlockType`](blockpress_types::BlockType)
//!   to the factory of its default configuration.
//! - [`blocks`] holds the schema and factory of every built-in block type.
//! - [`BlockConfigCodec`] turns configs into row drafts and stored rows back
//!   into configs.
//!
//! # Example
//!
//! ```
//! use blockpress_blocks::{BlockConfigCodec, BlockTypeRegistry};
//! use blockpress_types::{BlockType, ContentId};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(BlockTypeRegistry::with_builtin_blocks());
//! let hero = registry.create(&BlockType::Hero, 0).unwrap();
//!
//! let codec = BlockConfigCodec::new(registry);
//! let draft = codec.encode(&hero, ContentId::new(7));
//! assert_eq!(draft.position, 0);
//! assert!(draft.id.is_none());
//! ```

pub mod blocks;
mod codec;
mod error;
mod registry;

pub use codec::{strip_transient, BlockConfigCodec, POSITION_KEY, TRANSIENT_PREFIX};
pub use error::{CodecError, CodecResult, RegistryError, RegistryResult};
pub use registry::{BlockDefinition, BlockFactory, BlockTypeRegistry};
