// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and request dispatch.

use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::DaemonState;
use crate::protocol::{
    self, ClientRow, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION,
};
use desk_core::actor::Actor;
use desk_core::client::ClientId;
use desk_core::stage::Stage;
use desk_core::task::{TaskFilter, TaskId};
use desk_core::{AuthAdapter, AuthError, ResetToken, SessionToken};
use desk_engine::{ClientView, EngineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("request read timeout")]
    Timeout,
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

/// Handle a single client connection: one request, one response
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request: Request = match protocol::read_frame(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("client disconnected before sending a request");
            return Ok(());
        }
        Err(e) => {
            error!("failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!(?request, "received request");

    let response = handle_request(daemon, request).await;

    debug!(?response, "sending response");

    protocol::write_frame(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

fn error_response(e: &EngineError) -> Response {
    Response::Error {
        kind: e.kind().to_string(),
        message: e.to_string(),
    }
}

/// Resolve a session token to an actor, once per request
async fn resolve_actor(daemon: &DaemonState, token: &str) -> Result<Actor, Response> {
    match daemon
        .auth
        .session(&SessionToken(token.to_string()))
        .await
    {
        Ok(Some(actor)) => Ok(actor),
        Ok(None) => Err(Response::Error {
            kind: "unauthenticated".to_string(),
            message: "session unknown or expired; run `desk login`".to_string(),
        }),
        Err(e) => Err(Response::Error {
            kind: "upstream".to_string(),
            message: e.to_string(),
        }),
    }
}

/// Parse a stage name at the boundary. Normalization accepts current labels
/// (any case) and retired ones; anything that would silently fall back to
/// Lead without naming it is a validation error.
fn parse_stage(raw: &str) -> Result<Stage, Response> {
    let stage = Stage::normalize(raw);
    if stage == Stage::Lead && !raw.trim().eq_ignore_ascii_case("lead") {
        return Err(Response::Error {
            kind: "validation".to_string(),
            message: format!("unknown stage: {raw}"),
        });
    }
    Ok(stage)
}

fn parse_view(raw: &str) -> Result<ClientView, Response> {
    match raw.to_ascii_lowercase().as_str() {
        "active" => Ok(ClientView::Active),
        "archived" => Ok(ClientView::Archived),
        "all" => Ok(ClientView::All),
        other => Err(Response::Error {
            kind: "validation".to_string(),
            message: format!("unknown client view: {other}"),
        }),
    }
}

fn parse_filter(raw: &str) -> Result<TaskFilter, Response> {
    raw.parse::<TaskFilter>().map_err(|message| Response::Error {
        kind: "validation".to_string(),
        message,
    })
}

/// Handle a single request and return a response
async fn handle_request(daemon: &mut DaemonState, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => Response::Status {
            uptime_secs: daemon.start_time.elapsed().as_secs(),
            clients: daemon.engine.clients(ClientView::All).len(),
            tasks: daemon.engine.tasks(TaskFilter::All).len(),
        },

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }

        // ------------------------------------------------------------
        // Identity
        // ------------------------------------------------------------
        Request::SignIn { email, password } => {
            match daemon.auth.sign_in(&email, &password).await {
                Ok((token, actor)) => Response::Session {
                    token: token.0,
                    actor,
                },
                Err(e) => Response::Error {
                    kind: "unauthenticated".to_string(),
                    message: e.to_string(),
                },
            }
        }

        Request::SignOut { token } => {
            match daemon.auth.sign_out(&SessionToken(token)).await {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error {
                    kind: "upstream".to_string(),
                    message: e.to_string(),
                },
            }
        }

        Request::WhoAmI { token } => match resolve_actor(daemon, &token).await {
            Ok(actor) => Response::Actor { actor },
            Err(response) => response,
        },

        Request::ResetRequest { email } => {
            match daemon.auth.request_password_reset(&email).await {
                Ok(token) => Response::ResetToken {
                    token: token.map(|t| t.0),
                },
                Err(e) => Response::Error {
                    kind: "upstream".to_string(),
                    message: e.to_string(),
                },
            }
        }

        Request::ResetConfirm {
            token,
            new_password,
        } => {
            match daemon
                .auth
                .confirm_password_reset(&ResetToken(token), &new_password)
                .await
            {
                Ok(()) => Response::Ok,
                Err(e @ AuthError::UnknownResetToken) => Response::Error {
                    kind: "validation".to_string(),
                    message: e.to_string(),
                },
                Err(e) => Response::Error {
                    kind: "upstream".to_string(),
                    message: e.to_string(),
                },
            }
        }

        // ------------------------------------------------------------
        // Clients
        // ------------------------------------------------------------
        Request::ClientCreate { token, draft } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.create_client(draft).await {
                Ok(client) => Response::Client { client },
                Err(e) => error_response(&e),
            }
        }

        Request::ClientUpdate { token, id, draft } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon
                .engine
                .update_client(&ClientId::from(id), draft)
                .await
            {
                Ok(client) => Response::Client { client },
                Err(e) => error_response(&e),
            }
        }

        Request::ClientMove {
            token,
            id,
            to,
            observed,
        } => {
            let actor = match resolve_actor(daemon, &token).await {
                Ok(actor) => actor,
                Err(response) => return response,
            };
            let target = match parse_stage(&to) {
                Ok(stage) => stage,
                Err(response) => return response,
            };
            let id = ClientId::from(id);

            let result = match observed.as_deref() {
                Some(raw) => {
                    let observed = match parse_stage(raw) {
                        Ok(stage) => stage,
                        Err(response) => return response,
                    };
                    daemon
                        .engine
                        .transition_stage_from(&id, observed, target, actor.role)
                        .await
                }
                None => daemon.engine.transition_stage(&id, target, actor.role).await,
            };

            match result {
                Ok(outcome) => Response::Client {
                    client: outcome.client().clone(),
                },
                Err(e) => error_response(&e),
            }
        }

        Request::ClientArchive { token, id } => {
            let actor = match resolve_actor(daemon, &token).await {
                Ok(actor) => actor,
                Err(response) => return response,
            };
            match daemon
                .engine
                .archive_client(&ClientId::from(id), &actor.id)
                .await
            {
                Ok(client) => Response::Client { client },
                Err(e) => error_response(&e),
            }
        }

        Request::ClientUnarchive { token, id } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.unarchive_client(&ClientId::from(id)).await {
                Ok(client) => Response::Client { client },
                Err(e) => error_response(&e),
            }
        }

        Request::ClientDelete { token, id } => {
            let actor = match resolve_actor(daemon, &token).await {
                Ok(actor) => actor,
                Err(response) => return response,
            };
            match daemon
                .engine
                .delete_client(&ClientId::from(id), actor.role)
                .await
            {
                Ok(()) => Response::Ok,
                Err(e) => error_response(&e),
            }
        }

        Request::ClientGet { token, id } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.client(&ClientId::from(id)) {
                Ok(client) => Response::Client { client },
                Err(e) => error_response(&e),
            }
        }

        Request::ClientList { token, view } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            let view = match parse_view(&view) {
                Ok(view) => view,
                Err(response) => return response,
            };

            let clients = daemon.engine.clients(view);
            let mut rows = Vec::with_capacity(clients.len());
            for client in clients {
                let dwell = match daemon.engine.dwell(&client.id) {
                    Ok(dwell) => dwell,
                    Err(e) => return error_response(&e),
                };
                rows.push(ClientRow {
                    client,
                    days_in_stage: dwell.days,
                    tier: dwell.tier,
                });
            }
            Response::Clients { clients: rows }
        }

        // ------------------------------------------------------------
        // Tasks
        // ------------------------------------------------------------
        Request::TaskCreate { token, draft } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.create_task(draft).await {
                Ok(task) => Response::Task { task },
                Err(e) => error_response(&e),
            }
        }

        Request::TaskUpdate { token, id, draft } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.update_task(&TaskId::from(id), draft).await {
                Ok(task) => Response::Task { task },
                Err(e) => error_response(&e),
            }
        }

        Request::TaskComplete { token, id } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.complete_task(&TaskId::from(id)).await {
                Ok(task) => Response::Task { task },
                Err(e) => error_response(&e),
            }
        }

        Request::TaskReopen { token, id } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.reopen_task(&TaskId::from(id)).await {
                Ok(task) => Response::Task { task },
                Err(e) => error_response(&e),
            }
        }

        Request::TaskDelete { token, id } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            match daemon.engine.delete_task(&TaskId::from(id)).await {
                Ok(()) => Response::Ok,
                Err(e) => error_response(&e),
            }
        }

        Request::TaskList { token, filter } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            let filter = match parse_filter(&filter) {
                Ok(filter) => filter,
                Err(response) => return response,
            };
            Response::Tasks {
                tasks: daemon.engine.tasks(filter),
            }
        }

        // ------------------------------------------------------------
        // Derived reads
        // ------------------------------------------------------------
        Request::Analytics { token } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            Response::Analytics {
                rows: daemon.engine.analytics(),
            }
        }

        Request::Kpis { token } => {
            if let Err(response) = resolve_actor(daemon, &token).await {
                return response;
            }
            Response::Kpis {
                kpis: daemon.engine.kpis(),
            }
        }

        Request::Calendar => Response::Calendar {
            ics: daemon.engine.calendar_feed(),
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
