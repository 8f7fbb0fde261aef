//! MCP tool handlers for Backchodi Battle

use backchodi_core::{BattleError, GameMode, Result, ScoredResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::BattleServer;
use crate::content::ContentGenerator;
use crate::mcp::{RequestId, Response};
use crate::render;

/// Sample line scored by the connection test
const SAMPLE_BACKCHODI: &str =
    "Arre yaar, tumhara style dekh kar lagta hai fashion week se ban kar aaye ho!";

/// Tool definition for MCP tools/list
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Structured tool description, serialized to JSON for clients that read it
#[derive(Debug, Clone, Serialize)]
pub struct RichDescription {
    pub description: &'static str,
    pub use_when: &'static str,
    pub side_effects: &'static str,
}

impl RichDescription {
    fn new(description: &'static str, use_when: &'static str, side_effects: &'static str) -> Self {
        Self {
            description,
            use_when,
            side_effects,
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.description.to_string())
    }
}

fn caller_property() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": "Puch User Unique Identifier"
    })
}

fn tool(
    name: &str,
    description: RichDescription,
    properties: serde_json::Value,
    required: &[&str],
) -> ToolDef {
    let mut properties = properties;
    if let Some(map) = properties.as_object_mut() {
        map.insert("puch_user_id".into(), caller_property());
    }
    let mut required: Vec<&str> = required.to_vec();
    required.insert(0, "puch_user_id");

    ToolDef {
        name: name.into(),
        description: description.to_json(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        }),
    }
}

/// Get list of available tools
pub fn list_tools() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "validate".into(),
            description: "Return the server owner's identifier. Required by Puch.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        tool(
            "start_backchodi_battle",
            RichDescription::new(
                "Start a new Backchodi Battle game for a specific user.",
                "User wants to start a solo or duel backchodi battle game.",
                "Creates a new game session for the user.",
            ),
            serde_json::json!({
                "mode": {
                    "type": "string",
                    "enum": ["solo", "duel"],
                    "description": "Game mode"
                },
                "player_name": {
                    "type": "string",
                    "description": "Name of the player starting the game"
                }
            }),
            &["mode", "player_name"],
        ),
        tool(
            "join_battle",
            RichDescription::new(
                "Join an existing duel battle using session ID.",
                "User wants to join a duel battle that someone else created.",
                "Adds the user to an existing game session and starts the battle.",
            ),
            serde_json::json!({
                "session_id": {
                    "type": "string",
                    "description": "The session ID to join"
                },
                "player_name": {
                    "type": "string",
                    "description": "Name of the joining player"
                }
            }),
            &["session_id", "player_name"],
        ),
        tool(
            "send_backchodi",
            RichDescription::new(
                "Send a backchodi message in an active battle.",
                "User wants to send their witty response in an ongoing battle.",
                "Processes the message, scores it, and continues the battle.",
            ),
            serde_json::json!({
                "session_id": {
                    "type": "string",
                    "description": "The session ID"
                },
                "player_name": {
                    "type": "string",
                    "description": "Name of the player sending message"
                },
                "message": {
                    "type": "string",
                    "description": "The backchodi message"
                }
            }),
            &["session_id", "player_name", "message"],
        ),
        tool(
            "get_game_status",
            RichDescription::new(
                "Get current status of a game session.",
                "User wants to check the progress of their battle.",
                "None.",
            ),
            serde_json::json!({
                "session_id": {
                    "type": "string",
                    "description": "The session ID to check"
                }
            }),
            &["session_id"],
        ),
        tool(
            "list_active_games",
            RichDescription::new(
                "List all active games for a user.",
                "User wants to see their ongoing battles.",
                "None.",
            ),
            serde_json::json!({}),
            &[],
        ),
        tool(
            "get_game_rules",
            RichDescription::new(
                "Get comprehensive rules and instructions for Backchodi Battle.",
                "User wants to understand how to play the game.",
                "None.",
            ),
            serde_json::json!({}),
            &[],
        ),
        tool(
            "test_grok_connection",
            RichDescription::new(
                "Test Grok API connection and generate sample content.",
                "User wants to verify AI integration is working properly.",
                "None.",
            ),
            serde_json::json!({}),
            &[],
        ),
        tool(
            "configure_grok_api",
            RichDescription::new(
                "Configure Grok API key for AI-powered responses.",
                "User needs to set up or update their Grok API key.",
                "Updates the global Grok client configuration.",
            ),
            serde_json::json!({
                "api_key": {
                    "type": "string",
                    "description": "Your X.AI API key from https://x.ai/"
                }
            }),
            &["api_key"],
        ),
    ]
}

/// Parameters for tools that only identify the caller
#[derive(Debug, Deserialize)]
pub struct CallerParams {
    #[serde(default, alias = "caller_id")]
    pub puch_user_id: String,
}

/// Parameters for start_backchodi_battle
#[derive(Debug, Deserialize)]
pub struct StartBattleParams {
    #[serde(default, alias = "caller_id")]
    pub puch_user_id: String,
    pub mode: GameMode,
    pub player_name: String,
}

/// Parameters for join_battle
#[derive(Debug, Deserialize)]
pub struct JoinBattleParams {
    #[serde(default, alias = "caller_id")]
    pub puch_user_id: String,
    pub session_id: String,
    pub player_name: String,
}

/// Parameters for send_backchodi
#[derive(Debug, Deserialize)]
pub struct SendBackchodiParams {
    #[serde(default, alias = "caller_id")]
    pub puch_user_id: String,
    pub session_id: String,
    pub player_name: String,
    pub message: String,
}

/// Parameters for get_game_status
#[derive(Debug, Deserialize)]
pub struct GameStatusParams {
    #[serde(default, alias = "caller_id")]
    pub puch_user_id: String,
    pub session_id: String,
}

/// Parameters for configure_grok_api
#[derive(Debug, Deserialize)]
pub struct ConfigureGrokParams {
    #[serde(default, alias = "caller_id")]
    pub puch_user_id: String,
    #[serde(default)]
    pub api_key: String,
}

/// Handle a tools/call request
///
/// Game-rule violations come back as ordinary text results; only malformed
/// calls and server faults become JSON-RPC errors.
pub async fn handle_tool_call(
    name: &str,
    params: serde_json::Value,
    id: Option<RequestId>,
    server: &BattleServer,
) -> Response {
    let params = if params.is_null() {
        serde_json::json!({})
    } else {
        params
    };

    let result = match name {
        "validate" => Ok(server.owner_id().to_string()),
        "start_backchodi_battle" => handle_start_battle(params, server).await,
        "join_battle" => handle_join_battle(params, server).await,
        "send_backchodi" => handle_send_backchodi(params, server).await,
        "get_game_status" => handle_game_status(params, server).await,
        "list_active_games" => handle_list_active(params, server).await,
        "get_game_rules" => handle_rules(params, server).await,
        "test_grok_connection" => handle_test_connection(params, server).await,
        "configure_grok_api" => handle_configure(params, server).await,
        _ => Err(BattleError::UnknownTool(name.to_string())),
    };

    match result {
        Ok(text) => Response::text(id, text),
        Err(e) if e.is_in_band() => {
            debug!("Tool {} refused: {}", name, e);
            Response::text(id, e.to_string())
        }
        Err(e) => Response::error(id, e.rpc_code(), e.to_string()),
    }
}

async fn handle_start_battle(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: StartBattleParams = serde_json::from_value(params)?;
    let outcome = server
        .engine()
        .start_battle(&p.puch_user_id, p.mode, &p.player_name)
        .await?;
    Ok(render::start(&outcome))
}

async fn handle_join_battle(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: JoinBattleParams = serde_json::from_value(params)?;
    let outcome = server
        .engine()
        .join_battle(&p.puch_user_id, &p.session_id, &p.player_name)
        .await?;
    Ok(render::join(&outcome))
}

async fn handle_send_backchodi(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: SendBackchodiParams = serde_json::from_value(params)?;
    let outcome = server
        .engine()
        .send_message(&p.puch_user_id, &p.session_id, &p.player_name, &p.message)
        .await?;
    Ok(render::send(&outcome))
}

async fn handle_game_status(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: GameStatusParams = serde_json::from_value(params)?;
    let status = server.engine().status(&p.puch_user_id, &p.session_id).await?;
    Ok(render::status(&status))
}

async fn handle_list_active(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: CallerParams = serde_json::from_value(params)?;
    let games = server.engine().list_active(&p.puch_user_id).await?;
    Ok(render::active_games(&games))
}

async fn handle_rules(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: CallerParams = serde_json::from_value(params)?;
    server.engine().check_caller(&p.puch_user_id).await?;
    Ok(render::rules(server.engine().config().max_rounds))
}

async fn handle_test_connection(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: CallerParams = serde_json::from_value(params)?;
    server.engine().check_caller(&p.puch_user_id).await?;
    Ok(connection_report(server).await.0)
}

async fn handle_configure(params: serde_json::Value, server: &BattleServer) -> Result<String> {
    let p: ConfigureGrokParams = serde_json::from_value(params)?;
    server.engine().check_caller(&p.puch_user_id).await?;

    let api_key = p.api_key.trim();
    if api_key.is_empty() {
        return Ok(render::INVALID_API_KEY.to_string());
    }

    if let Err(e) = server.engine().content().configure(api_key).await {
        return Ok(render::configure_error(&e.to_string()));
    }
    info!("Content backend reconfigured by {}", p.puch_user_id);

    let (report, ok) = connection_report(server).await;
    Ok(render::configured(&report, ok))
}

/// Exercise the primary generator directly, without the fallback
async fn connection_report(server: &BattleServer) -> (String, bool) {
    let Some(primary) = server.engine().content().primary().await else {
        return (render::NOT_CONFIGURED.to_string(), false);
    };

    match probe(primary.as_ref()).await {
        Ok((challenge, scored)) => (render::connection_ok(&challenge, &scored), true),
        Err(e) => (render::connection_failed(&e.to_string()), false),
    }
}

async fn probe(generator: &dyn ContentGenerator) -> Result<(String, ScoredResponse)> {
    let challenge = generator
        .generate_challenge("Connection test", "Test User")
        .await?;
    let scored = generator
        .score_response(SAMPLE_BACKCHODI, &challenge, "Test scoring")
        .await?;
    Ok((challenge, ScoredResponse::new(scored.score, scored.feedback)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{BrokenContent, ScriptedContent};
    use crate::content::{FallbackContent, PrimaryFactory, ResilientContent};
    use crate::engine::{BattleEngine, EngineConfig};
    use crate::store::SessionStore;
    use backchodi_core::error_codes;
    use serde_json::json;
    use std::sync::Arc;

    fn server_with(content: ResilientContent) -> BattleServer {
        let engine = BattleEngine::new(SessionStore::new(), Arc::new(content), EngineConfig::default());
        BattleServer::new(engine, "919876543210")
    }

    fn fallback_server() -> BattleServer {
        server_with(ResilientContent::new(FallbackContent::seeded(7)))
    }

    async fn call(server: &BattleServer, name: &str, args: serde_json::Value) -> Response {
        handle_tool_call(name, args, Some(RequestId::Number(1)), server).await
    }

    fn text(response: &Response) -> &str {
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
    }

    fn code(response: &Response) -> i32 {
        response.error.as_ref().expect("expected an error").code
    }

    fn session_id_from(text: &str) -> String {
        let line = text
            .lines()
            .find(|l| l.starts_with("**Session ID:**"))
            .unwrap();
        line.trim_start_matches("**Session ID:**").trim().to_string()
    }

    #[test]
    fn test_tool_catalogue() {
        let tools = list_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "validate",
                "start_backchodi_battle",
                "join_battle",
                "send_backchodi",
                "get_game_status",
                "list_active_games",
                "get_game_rules",
                "test_grok_connection",
                "configure_grok_api"
            ]
        );

        for tool in tools.iter().skip(1) {
            let required = tool.input_schema["required"].as_array().unwrap();
            assert_eq!(required[0], "puch_user_id", "{}", tool.name);

            let rich: serde_json::Value = serde_json::from_str(&tool.description).unwrap();
            assert!(rich["description"].is_string());
            assert!(rich["use_when"].is_string());
            assert!(rich["side_effects"].is_string());
        }
    }

    #[tokio::test]
    async fn test_validate_returns_owner() {
        let server = fallback_server();
        assert_eq!(text(&call(&server, "validate", json!(null)).await), "919876543210");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = fallback_server();
        let response = call(&server, "sim_step", json!({})).await;
        assert_eq!(code(&response), error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_caller_is_invalid_params() {
        let server = fallback_server();
        for (name, args) in [
            ("start_backchodi_battle", json!({"mode": "solo", "player_name": "Ravi"})),
            ("list_active_games", json!(null)),
            ("get_game_rules", json!({"puch_user_id": ""})),
            ("get_game_status", json!({"session_id": "x"})),
        ] {
            let response = call(&server, name, args).await;
            assert_eq!(code(&response), error_codes::INVALID_PARAMS, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_invalid_params() {
        let server = fallback_server();
        let bad_mode = call(
            &server,
            "start_backchodi_battle",
            json!({"puch_user_id": "u1", "mode": "team", "player_name": "Ravi"}),
        )
        .await;
        assert_eq!(code(&bad_mode), error_codes::INVALID_PARAMS);

        let missing_message = call(
            &server,
            "send_backchodi",
            json!({"puch_user_id": "u1", "session_id": "x", "player_name": "Ravi"}),
        )
        .await;
        assert_eq!(code(&missing_message), error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_caller_id_alias() {
        let server = fallback_server();
        let response = call(&server, "list_active_games", json!({"caller_id": "u1"})).await;
        assert!(text(&response).starts_with("No active games found!"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_in_band() {
        let server = fallback_server();
        let response = call(
            &server,
            "get_game_status",
            json!({"puch_user_id": "u1", "session_id": "u1_missing"}),
        )
        .await;
        assert_eq!(text(&response), "Invalid session ID! Game not found.");
    }

    #[tokio::test]
    async fn test_solo_game_over_tools() {
        let server = fallback_server();
        let started = call(
            &server,
            "start_backchodi_battle",
            json!({"puch_user_id": "u1", "mode": "solo", "player_name": "Ravi"}),
        )
        .await;
        let started = text(&started);
        assert!(started.starts_with("🎮 **Backchodi Battle Started!**"));
        let session_id = session_id_from(started);

        let again = call(
            &server,
            "start_backchodi_battle",
            json!({"puch_user_id": "u1", "mode": "duel", "player_name": "Ravi"}),
        )
        .await;
        assert_eq!(
            text(&again),
            format!("Game already in progress! Session ID: {}", session_id)
        );

        let mut last = String::new();
        for _ in 0..5 {
            let response = call(
                &server,
                "send_backchodi",
                json!({
                    "puch_user_id": "u1",
                    "session_id": session_id,
                    "player_name": "Ravi",
                    "message": "Arre yaar, ekdum bakwaas!"
                }),
            )
            .await;
            last = text(&response).to_string();
        }
        assert!(last.contains("🎮 **GAME FINISHED!**"));

        let status = call(
            &server,
            "get_game_status",
            json!({"puch_user_id": "u1", "session_id": session_id}),
        )
        .await;
        assert!(text(&status).contains("**State:** Finished"));
        assert!(text(&status).ends_with("🏁 Game finished!"));
    }

    #[tokio::test]
    async fn test_duel_over_tools() {
        let server = fallback_server();
        let created = call(
            &server,
            "start_backchodi_battle",
            json!({"puch_user_id": "u1", "mode": "duel", "player_name": "A"}),
        )
        .await;
        let session_id = session_id_from(text(&created));

        let listed = call(&server, "list_active_games", json!({"puch_user_id": "u1"})).await;
        assert!(text(&listed).contains("• State: Waiting"));

        let early = call(
            &server,
            "send_backchodi",
            json!({"puch_user_id": "u1", "session_id": session_id, "player_name": "A", "message": "hi"}),
        )
        .await;
        assert_eq!(text(&early), "Game is not active!");

        let joined = call(
            &server,
            "join_battle",
            json!({"puch_user_id": "u1", "session_id": session_id, "player_name": "B"}),
        )
        .await;
        assert!(text(&joined).contains("**Players:** A vs B"));

        let full = call(
            &server,
            "join_battle",
            json!({"puch_user_id": "u1", "session_id": session_id, "player_name": "C"}),
        )
        .await;
        assert_eq!(text(&full), "Game is not accepting new players!");

        let stranger = call(
            &server,
            "send_backchodi",
            json!({"puch_user_id": "u1", "session_id": session_id, "player_name": "C", "message": "hi"}),
        )
        .await;
        assert_eq!(text(&stranger), "Player not found in this game!");

        let first = call(
            &server,
            "send_backchodi",
            json!({"puch_user_id": "u1", "session_id": session_id, "player_name": "A", "message": "hi"}),
        )
        .await;
        assert!(text(&first).contains("**Messages this round:** 1/2"));
        assert!(text(&first).ends_with("Waiting for B!"));

        let second = call(
            &server,
            "send_backchodi",
            json!({"puch_user_id": "u1", "session_id": session_id, "player_name": "B", "message": "bye"}),
        )
        .await;
        assert!(text(&second).starts_with("✅ **Round 2/5 Message sent!**"));
        assert!(text(&second).ends_with("Waiting for next round!"));
    }

    #[tokio::test]
    async fn test_rules_text() {
        let server = fallback_server();
        let rules = call(&server, "get_game_rules", json!({"puch_user_id": "u1"})).await;
        assert!(text(&rules).starts_with("🎮 **BACKCHODI BATTLE RULES**"));
    }

    #[tokio::test]
    async fn test_connection_without_primary() {
        let server = fallback_server();
        let response = call(&server, "test_grok_connection", json!({"puch_user_id": "u1"})).await;
        assert_eq!(text(&response), render::NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn test_connection_with_scripted_primary() {
        let content = ResilientContent::new(FallbackContent::seeded(7))
            .with_primary(Arc::new(ScriptedContent::with_scores(&[7.5])));
        let server = server_with(content);

        let response = call(&server, "test_grok_connection", json!({"puch_user_id": "u1"})).await;
        let report = text(&response);
        assert!(report.starts_with("✅ **Grok Integration Working!**"));
        assert!(report.contains("challenge #1 for Test User"));
        assert!(report.contains("Score: 7.5/10"));
    }

    #[tokio::test]
    async fn test_connection_reports_primary_error() {
        let content = ResilientContent::new(FallbackContent::seeded(7))
            .with_primary(Arc::new(BrokenContent::failing()));
        let server = server_with(content);

        let response = call(&server, "test_grok_connection", json!({"puch_user_id": "u1"})).await;
        assert!(text(&response).starts_with("❌ Grok API Error: "));
    }

    #[tokio::test]
    async fn test_configure_api_key() {
        let server = fallback_server();
        let blank = call(
            &server,
            "configure_grok_api",
            json!({"puch_user_id": "u1", "api_key": "   "}),
        )
        .await;
        assert_eq!(text(&blank), render::INVALID_API_KEY);

        let no_backend = call(
            &server,
            "configure_grok_api",
            json!({"puch_user_id": "u1", "api_key": "xai-123"}),
        )
        .await;
        assert!(text(&no_backend).starts_with("❌ **Error configuring Grok API:**"));

        let factory: PrimaryFactory = Arc::new(|key: &str| {
            let generator: Arc<dyn ContentGenerator> = Arc::new(ScriptedContent::named(key));
            Ok(generator)
        });
        let server =
            server_with(ResilientContent::new(FallbackContent::seeded(7)).with_factory(factory));
        let configured = call(
            &server,
            "configure_grok_api",
            json!({"puch_user_id": "u1", "api_key": " xai-123 "}),
        )
        .await;
        assert!(text(&configured).starts_with("✅ **Grok API Configured Successfully!**"));

        let primary = server.engine().content().primary().await.unwrap();
        assert_eq!(primary.name(), "xai-123");
    }
}
