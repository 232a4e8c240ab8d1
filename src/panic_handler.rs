use crossterm::{cursor::Show, execute, terminal::disable_raw_mode};
use std::io::{self, Write};
use std::panic;

/// Install better-panic backtraces behind a hook that first puts the
/// terminal back into cooked mode
pub fn initialize_panic_handler() {
    better_panic::install();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
        std::process::exit(1);
    }));
}

/// Leave raw mode and show the cursor again. The status line is drawn on
/// stderr, so that is where the cursor and trailing newline go.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stderr(), Show);
    let _ = writeln!(io::stderr());
}
