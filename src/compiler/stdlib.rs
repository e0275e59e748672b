//! Import path resolution.
//!
//! Relative imports point at other compiled modules and get a `.js`
//! extension when written without one. Any other import name refers to a
//! shim in the stdlib directory, addressed by an absolute `file://` URL so
//! the generated module can run from anywhere.

use crate::CompileOptions;

/// Whether `source` is written relative to the importing file.
pub fn is_relative(source: &str) -> bool {
    source.starts_with("./") || source.starts_with("../")
}

/// Rewrites an import source into the specifier emitted in the module.
///
/// # Arguments
///
/// * `source` - The path or name written after `from`
/// * `options` - Compilation settings holding the stdlib root
pub fn resolve_import(source: &str, options: &CompileOptions) -> String {
    if is_relative(source) {
        if source.ends_with(".js") || source.ends_with(".mjs") {
            return source.to_string();
        }
        return format!("{}.js", source);
    }

    stdlib_url(source, options)
}

/// `file://{root}/stdlib/{name}.js`
pub fn stdlib_url(name: &str, options: &CompileOptions) -> String {
    let path = options
        .stdlib_root
        .join("stdlib")
        .join(format!("{}.js", name));
    let path = path.to_string_lossy().replace('\\', "/");

    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}
