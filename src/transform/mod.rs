//! Content transformations applied by pipeline tasks.
//!
//! Each submodule wraps one kind of source:
//! - [`css`]: lightningcss lowering, prefixing and minification
//! - [`js`]: oxc transpilation and minification
//! - [`html`]: whitespace-collapsing HTML minifier
//! - [`svg`]: quick-xml based SVG minifier

pub mod css;
pub mod html;
pub mod js;
pub mod svg;
