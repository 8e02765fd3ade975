use clap::Parser;

mod commands;
mod output;

use commands::fix;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tagfix")]
#[command(version = VERSION)]
#[command(about = "Rewrite every occurrence of an element into its bare self-closing form")]
struct Cli {
    #[command(flatten)]
    args: fix::FixArgs,

    /// Print a JSON envelope instead of progress lines
    #[arg(long)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = fix::run(cli.args, !cli.json);

    if cli.json {
        let (json_result, exit_code) = output::map_cmd_result_to_json(result);
        let _ = output::print_json_result(json_result);
        return std::process::ExitCode::from(exit_code_to_u8(exit_code));
    }

    match result {
        Ok((summary, exit_code)) => {
            let _ = output::print_text(&format!("\n{}", fix::summary_line(&summary)));
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
        Err(err) => {
            output::print_error_text(&err);
            std::process::ExitCode::from(exit_code_to_u8(output::exit_code_for_error(err.code)))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
