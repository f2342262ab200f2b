mod commands;
mod terminal;

use commands::{CommandLine, sweep};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    let cfg = commands.config();
    print::banner(cfg.no_banner, cfg.quiet);

    sweep::sweep(&commands, &cfg).await
}
