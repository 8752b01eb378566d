use super::{spinner, AppContext};
use crate::form::FormAction;
use crate::submit::Submitter;
use crate::Result;
use colored::Colorize;

/// Close the working case: send it, drop its draft, start a blank form
pub async fn run(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let sync = ctx.synchronizer(false)?;
    let mut session = ctx.session()?;

    let pb = spinner("Sending case...");
    let result = Submitter::new(&client, &sync).submit(session.state()).await;
    pb.finish_and_clear();

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            println!("   The form and its draft were kept; run submit again to retry.");
            anyhow::bail!("Could not send the case: {}", e);
        }
    };

    session.dispatch(FormAction::Reset);
    session.save()?;

    println!("{}", format!("✓ Case {} sent and closed", receipt.id).green());
    if let Some(warning) = receipt.cleanup.warning() {
        println!("{}", format!("⚠ {}", warning).yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SocConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_failed_send_is_an_error_and_keeps_form() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = listener.local_addr().unwrap();
        drop(listener);

        let temp = TempDir::new().unwrap();
        let mut config = SocConfig::default();
        config.client.endpoint = format!("http://{}/api/proxy", dead);
        config.client.remote_drafts = false;
        config.client.timeout_secs = 2;
        let ctx = AppContext::new(config, Some(temp.path().to_path_buf())).unwrap();

        let mut session = ctx.session().unwrap();
        session.dispatch(FormAction::AssignId("PEND-keep-00001".into()));
        session.save().unwrap();

        let result = run(&ctx).await;
        assert!(result.unwrap_err().to_string().contains("Could not send the case"));

        let session = ctx.session().unwrap();
        assert_eq!(session.state().id.as_deref(), Some("PEND-keep-00001"));
    }
}
