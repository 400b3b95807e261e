/// STLView Terminal - spinning, gradient-colored STL viewer
///
/// Usage: stlview-terminal [path/to/file.stl]
///
/// Without a path the demo cube is shown.
/// Controls:
///   - x/y/z: Spin faster around an axis (shift to slow down)
///   - 0: Stop spinning
///   - +/- or mouse wheel: Zoom
///   - Q/ESC: Quit

use std::env;
use std::fs;
use std::io;
use stlview_core::ViewerConfig;
use stlview_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut app = TerminalApp::new(ViewerConfig::default())?;

    if let Some(path) = env::args().nth(1) {
        println!("Loading STL file: {}", path);
        let data = fs::read(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("Failed to read STL file {}: {}", path, e))
        })?;

        match app.load_file(&data) {
            Ok(()) => println!("Loaded {}", path),
            Err(e) => {
                eprintln!("{}, showing the demo cube instead", e);
                std::thread::sleep(std::time::Duration::from_secs(2));
            }
        }
    }

    app.run()?;

    println!("Thank you for using STLView!");
    Ok(())
}
