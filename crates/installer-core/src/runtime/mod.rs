//! PHP toolchain detection
//!
//! This module provides:
//! - PHP executable lookup and capability checks (extensions, version)
//! - Composer resolution (local `composer.phar` or the global binary)

pub mod composer;
pub mod php;

pub use composer::find_composer;
pub use php::{ensure_extensions_available, loaded_extensions, php_binary, REQUIRED_EXTENSIONS};
