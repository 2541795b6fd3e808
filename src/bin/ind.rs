use colored::Colorize;
use ind::cli::{
    actions::{self, Action, download, output, outputs, upload, wait},
    start,
};
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let (api, action, globals) = match start() {
        Ok(rs) => rs,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            process::exit(1);
        }
    };

    let cancel = CancellationToken::new();

    // Ctrl-C
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupted, cancelling");
            token.cancel();
        }
    });

    // --timeout
    if let Some(timeout) = globals.timeout {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            log::warn!("timeout of {}s reached, cancelling", timeout.as_secs());
            token.cancel();
        });
    }

    let rs = match action {
        Action::Upload { .. } => upload::handle(&api, action, &globals, &cancel).await,
        Action::CreateOutput { .. } => output::handle(&api, action, &globals, &cancel).await,
        Action::ListOutputs { .. } => outputs::handle(&api, action).await,
        Action::WaitOutput { .. } => wait::handle(&api, action, &globals, &cancel).await,
        Action::Download { .. } => download::handle(&api, action).await,
    };

    if let Err(e) = rs {
        eprintln!("{} {e:#}", "Error:".red());
        process::exit(actions::exit_code(&e));
    }
}
