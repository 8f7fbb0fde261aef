//! stdio transport for MCP JSON-RPC

use crate::BattleServer;
use crate::mcp::{Request, Response};
use backchodi_core::{BattleError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Run the MCP server on stdio
pub async fn run(server: &BattleServer) -> Result<()> {
    info!("Backchodi Battle MCP server starting on stdio");
    let reader = BufReader::new(tokio::io::stdin());
    serve(server, reader, tokio::io::stdout()).await
}

/// Serve newline-delimited JSON-RPC until the reader hits EOF
pub async fn serve<R, W>(server: &BattleServer, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| BattleError::Transport(format!("Failed to read stdin: {}", e)))?;

        if bytes_read == 0 {
            // EOF - client disconnected
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => server.handle_request(&request).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Some(Response::parse_error(format!("Parse error: {}", e)))
            }
        };

        let Some(response) = response else {
            continue;
        };

        let response_json = serde_json::to_string(&response)?;
        debug!("Sending: {}", response_json);

        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| BattleError::Transport(format!("Failed to write stdout: {}", e)))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| BattleError::Transport(format!("Failed to write newline: {}", e)))?;
        writer
            .flush()
            .await
            .map_err(|e| BattleError::Transport(format!("Failed to flush stdout: {}", e)))?;
    }

    Ok(())
}
