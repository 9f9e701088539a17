//! Embedded assets compiled into the binary.
//!
//! The live reload client is minified by the build script and injected
//! into HTML served in dev mode. The script carries a
//! `__ASPEN_WS_PORT__` placeholder replaced with the actual WebSocket
//! port at injection time, since the port may shift on bind conflicts.

/// Minified live reload client (see build.rs).
pub const LIVERELOAD_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/livereload.min.js"));

/// Render the inline script tag for the given WebSocket port.
pub fn livereload_script(ws_port: u16) -> String {
    let js = LIVERELOAD_JS.replace("__ASPEN_WS_PORT__", &ws_port.to_string());
    format!("<script>{js}</script>")
}

/// Inject the live reload client before `</body>`.
///
/// Falls back to appending when the page has no closing body tag,
/// which browsers handle gracefully.
pub fn inject_livereload(content: &[u8], ws_port: u16) -> Vec<u8> {
    let script = livereload_script(ws_port);
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        let mut result = Vec::with_capacity(content.len() + script_bytes.len());
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
        return result;
    }

    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    result.extend_from_slice(content);
    result.extend_from_slice(script_bytes);
    result
}
