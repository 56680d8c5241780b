use std::env;

use anyhow::Result;
use jwplatform_core::{Context, OsEnv, ProvideCredential};
use jwplatform_file_read_tokio::TokioFileRead;
use jwplatform_http_send_reqwest::ReqwestHttpSend;
use jwplatform_v1::{ApiResponse, Client, Config, DefaultCredentialProvider, Failure, Method, Params};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for debugging
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = Config::new().from_env(&ctx);
    let provider = DefaultCredentialProvider::new(config.clone().into());

    // Without credentials only show what would be sent
    if provider.provide_credential(&ctx).await?.is_none() {
        println!("No JW Platform credentials found, signing with demo credentials");
        let client = Client::new(ctx, jwplatform_v1::Credential::new("demo_key", "demo_secret")?);
        let params = Params::from([("title".to_string(), "My video".to_string())]);
        let req = jwplatform_v1::RequestBuilder::new(client.endpoint()).build(
            client.credential(),
            Method::Post,
            "/videos/create",
            Some(&params),
            true,
        )?;
        println!("POST {}", req.uri());
        println!("{}", String::from_utf8_lossy(req.body()));
        return Ok(());
    }

    let client = Client::load(ctx, &config, provider).await?;

    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: upload <video file> [title]"))?;
    let title = env::args().nth(2).unwrap_or_else(|| "Uploaded video".to_string());
    let metadata = Params::from([("title".to_string(), title)]);

    match client.upload(Some(&metadata), &path).await? {
        ApiResponse::Success(payload) => {
            println!("Upload finished: {}", payload["media"]["key"]);
        }
        ApiResponse::Failure(Failure::Http { status, body }) => {
            eprintln!("Video creation refused with {status}: {body}");
        }
        ApiResponse::Failure(Failure::Upload { status, body }) => {
            eprintln!("Upload refused with status {status}: {body}");
        }
    }

    Ok(())
}
