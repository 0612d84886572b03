fn main() {
    if handle_cli_flags() {
        return;
    }

    if let Err(err) = fontlet::run() {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn handle_cli_flags() -> bool {
    let mut saw_flag = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("FontLet {}", fontlet::VERSION);
                saw_flag = true;
            }
            "--help" | "-h" => {
                println!(
                    "FontLet — Preview your text in every installed figlet font.\n\n  --version, -V        Show version and exit\n  --help,    -h        Show this help message\n\nConfig: {}\nEnvironment: FONTLET_FIGLET__COMMAND, FONTLET_UI__THEME, {}=1 for a debug log",
                    fontlet::config::default_path()
                        .map(|path| path.display().to_string())
                        .unwrap_or_else(|| "~/.config/fontlet/config.yaml".to_string()),
                    fontlet::logging::DEBUG_ENV,
                );
                saw_flag = true;
            }
            _ => {}
        }
    }
    saw_flag
}
