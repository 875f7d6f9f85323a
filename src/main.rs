//! cfn2ddb CLI: CloudFormation DynamoDB tables to DynamoDB Local commands.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "cfn2ddb",
    version,
    about = "Translate AWS Cloud Formation template to AWS CLI commands"
)]
struct Cli {
    #[command(flatten)]
    args: cfn2ddb::cli::TranslateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cfn2ddb::cli::init_logging(cli.args.verbose, cli.args.quiet);

    match cfn2ddb::cli::dispatch(&cli.args) {
        Ok(commands) => {
            let mut stdout = std::io::stdout().lock();
            for command in &commands {
                if let Err(e) = stdout.write_all(command.as_bytes()) {
                    eprintln!("error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            match stdout.flush() {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
