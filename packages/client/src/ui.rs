//! Terminal helpers.

use std::io::Write;

/// Redraw the readline prompt after an asynchronous line was printed over it.
pub fn redisplay_prompt(display_name: &str) {
    print!("{}> ", display_name);
    let _ = std::io::stdout().flush();
}
