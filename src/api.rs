// API client module: a small blocking HTTP client for the eero cloud API.
// It owns the session credential and turns every response into either a
// typed payload or a `crate::Error`.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{
    reason_phrase, Account, Device, Envelope, LoginData, LoginRequest, Network, VerifyRequest,
    SUCCESS_CODE,
};
use crate::session::Credential;

/// Name of the cookie carrying the session (or pre-verify) token.
pub const SESSION_COOKIE: &str = "s";

static TRAILING_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+$").expect("trailing digit pattern is valid"));

/// Where the client is in the login flow.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    PendingVerification,
    Authenticated(Credential),
}

/// Result of a successful `login` call; must be handed to `verify`.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    identifier: String,
    user_token: String,
}

impl LoginAttempt {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn user_token(&self) -> &str {
        &self.user_token
    }
}

/// A network whose device list could not be fetched.
#[derive(Debug)]
pub struct NetworkFailure {
    pub network: Network,
    pub error: Error,
}

/// Outcome of `devices_per_network`: everything that could be fetched
/// plus one entry per network that failed.
#[derive(Debug, Default)]
pub struct DeviceSweep {
    pub devices: Vec<Device>,
    pub failures: Vec<NetworkFailure>,
}

impl DeviceSweep {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Blocking client that holds the reqwest client, the transport config
/// and the current authentication state.
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    state: AuthState,
}

impl ApiClient {
    /// Build an unauthenticated client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(ApiClient {
            client,
            config,
            state: AuthState::Unauthenticated,
        })
    }

    /// Attach a previously stored credential.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.state = AuthState::Authenticated(credential);
        self
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn credential(&self) -> Option<&Credential> {
        match &self.state {
            AuthState::Authenticated(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask the server to send a one-time code to `identifier` (phone or
    /// email). Returns the pre-verify token needed by `verify`.
    pub fn login(&mut self, identifier: &str) -> Result<LoginAttempt> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(Error::EmptyIdentifier);
        }

        let request = self
            .client
            .post(self.config.endpoint("login"))
            .json(&LoginRequest { identifier });

        let outcome = self
            .send::<LoginData>("login", request, None)
            .and_then(|data| match data {
                Some(d) if !d.user_token.is_empty() => Ok(d),
                _ => Err(Error::MissingPayload {
                    endpoint: "login".into(),
                }),
            });

        match outcome {
            Ok(data) => {
                if !self.is_authenticated() {
                    self.state = AuthState::PendingVerification;
                }
                info!(identifier, "login code requested");
                Ok(LoginAttempt {
                    identifier: identifier.to_string(),
                    user_token: data.user_token,
                })
            }
            Err(e) => {
                self.abandon_pending();
                Err(e)
            }
        }
    }

    /// Confirm the one-time code. On success the pre-verify token becomes
    /// the session credential used by every later call.
    pub fn verify(&mut self, attempt: LoginAttempt, code: &str) -> Result<Credential> {
        let pending = Credential::new(attempt.user_token);
        let request = self
            .client
            .post(self.config.endpoint("login/verify"))
            .json(&VerifyRequest { code: code.trim() });

        // The payload is account-shaped or missing; only the status matters.
        match self.send::<Value>("login/verify", request, Some(&pending)) {
            Ok(_) => {
                info!(identifier = %attempt.identifier, "login verified");
                self.state = AuthState::Authenticated(pending.clone());
                Ok(pending)
            }
            Err(e) => {
                self.abandon_pending();
                Err(e)
            }
        }
    }

    /// Fetch the authenticated user's account.
    pub fn account(&self) -> Result<Account> {
        let request = self.client.get(self.config.endpoint("account"));
        self.send::<Account>("account", request, self.credential())?
            .ok_or_else(|| Error::MissingPayload {
                endpoint: "account".into(),
            })
    }

    /// Networks embedded in the account. The explicit count is trusted
    /// over the list length.
    pub fn networks(&self) -> Result<Vec<Network>> {
        let account = self.account()?;
        if account.networks.count == 0 {
            return Ok(Vec::new());
        }
        Ok(account.networks.data)
    }

    /// Devices of every network, concatenated in network order. The first
    /// failing network aborts the whole call.
    pub fn devices(&self) -> Result<Vec<Device>> {
        let mut devices = Vec::new();
        for network in self.networks()? {
            devices.extend(self.network_devices(&network)?);
        }
        Ok(devices)
    }

    /// Like `devices`, but keeps going past failing networks and reports
    /// them alongside whatever was fetched. Failing to read the account is
    /// still an error.
    pub fn devices_per_network(&self) -> Result<DeviceSweep> {
        let mut sweep = DeviceSweep::default();
        for network in self.networks()? {
            match self.network_devices(&network) {
                Ok(devices) => sweep.devices.extend(devices),
                Err(error) => {
                    warn!(url = %network.url, %error, "skipping network");
                    sweep.failures.push(NetworkFailure { network, error });
                }
            }
        }
        Ok(sweep)
    }

    fn network_devices(&self, network: &Network) -> Result<Vec<Device>> {
        let id = network_id(&network.url)?;
        let endpoint = format!("networks/{}/devices", id);
        let request = self.client.get(self.config.endpoint(&endpoint));
        let devices = self
            .send::<Vec<Device>>(&endpoint, request, self.credential())?
            .unwrap_or_default();
        debug!(network = id, count = devices.len(), "fetched devices");
        Ok(devices)
    }

    fn abandon_pending(&mut self) {
        if self.state == AuthState::PendingVerification {
            self.state = AuthState::Unauthenticated;
        }
    }

    /// Shared request protocol: attach the token, send, decode the
    /// envelope, and only then decode the payload.
    fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        token: Option<&Credential>,
    ) -> Result<Option<T>> {
        let request = match token {
            Some(c) => request.header(COOKIE, format!("{}={}", SESSION_COOKIE, c.as_str())),
            None => request,
        };

        debug!(endpoint, authenticated = token.is_some(), "sending request");
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(endpoint, status, bytes = body.len(), "response received");
        trace!(endpoint, %body);

        let envelope: Envelope<Value> = match serde_json::from_str(&body) {
            Ok(env) => env,
            Err(source) if status == SUCCESS_CODE => {
                return Err(Error::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(Error::Api {
                    code: status,
                    message: reason_phrase(status),
                })
            }
        };

        match envelope.into_result(status)? {
            None | Some(Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|source| Error::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                }),
        }
    }
}

/// Numeric network id: the trailing run of digits of the network URL.
pub fn network_id(url: &str) -> Result<&str> {
    TRAILING_DIGITS
        .find(url)
        .map(|m| m.as_str())
        .ok_or_else(|| Error::MalformedNetworkReference {
            url: url.to_string(),
        })
}
