//! Binary that emits command-line options markdown to stdout.
//!
//! Used to refresh the command-line options reference page.

fn main() {
    print!("{}", chartgrid_cli::render_options_markdown());
}
