use mazegraph::console::{Console, ConsoleConfig, TerminalGuard, init_logging};

fn main() -> std::io::Result<()> {
    let config = ConsoleConfig::default();
    let _guard = init_logging(&config);

    let result = {
        let mut terminal = TerminalGuard::enter()?;
        Console::new(config).run(terminal.stdout())
    };

    if let Err(e) = &result {
        tracing::error!("Console exited with an error: {}", e);
    }
    result
}
