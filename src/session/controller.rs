//! Session controller - the transition function over `SessionState`

use std::path::PathBuf;

use crate::error::SessionError;
use crate::presets::{PresetStore, StoredParams};
use crate::request::{assemble, Assembly, Exchange, FormValues, RequestSummary, Transport};
use crate::session::prompter::{EndpointChoice, PresetChoice, Prompter, Renderer};
use crate::session::state::{SessionEnd, SessionState};
use crate::spec::{discover, load_spec, Endpoint, SpecDocument};

/// Where to look for specs and presets
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Discovery root; also holds the preset file
    pub root: PathBuf,
    /// File-name or glob patterns for discovery
    pub patterns: Vec<String>,
    /// Skip discovery and use this spec
    pub spec: Option<PathBuf>,
}

impl SessionOptions {
    pub fn new(root: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        SessionOptions {
            root: root.into(),
            patterns,
            spec: None,
        }
    }

    pub fn with_spec(mut self, spec: impl Into<PathBuf>) -> Self {
        self.spec = Some(spec.into());
        self
    }
}

/// The spec currently being explored
struct LoadedSpec {
    path: PathBuf,
    document: SpecDocument,
    endpoints: Vec<Endpoint>,
}

/// One operator session: discovery through display, single-shot
pub struct Session<P, T, R> {
    options: SessionOptions,
    prompter: P,
    transport: T,
    renderer: R,
    store: PresetStore,
    candidates: Vec<PathBuf>,
    loaded: Option<LoadedSpec>,
}

impl<P, T, R> Session<P, T, R>
where
    P: Prompter,
    T: Transport,
    R: Renderer,
{
    /// Create a session; the preset store under the root is read here
    pub fn new(options: SessionOptions, prompter: P, transport: T, renderer: R) -> Result<Self, SessionError> {
        let store = PresetStore::load(&options.root)?;
        Ok(Session {
            options,
            prompter,
            transport,
            renderer,
            store,
            candidates: Vec::new(),
            loaded: None,
        })
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn document(&self) -> Option<&SpecDocument> {
        self.loaded.as_ref().map(|l| &l.document)
    }

    /// Drive the state machine from discovery until it finishes
    pub async fn run(&mut self) -> Result<SessionEnd, SessionError> {
        let mut state = SessionState::DiscoveringSpec;
        loop {
            if let SessionState::Finished(end) = state {
                tracing::info!(?end, "Session finished");
                return Ok(end);
            }
            state = self.step(state).await?;
        }
    }

    /// Execute one state and return the next
    pub async fn step(&mut self, state: SessionState) -> Result<SessionState, SessionError> {
        tracing::info!(state = state.name(), "Entering state");

        match state {
            SessionState::DiscoveringSpec => self.discover_specs(),

            SessionState::SelectingSpec => {
                let choice = self
                    .prompter
                    .select_spec(&self.candidates)
                    .map_err(SessionError::Prompt)?;
                Ok(match choice {
                    Some(path) => SessionState::LoadingSpec(path),
                    None => SessionState::Finished(SessionEnd::Canceled),
                })
            }

            SessionState::LoadingSpec(path) => {
                let document = load_spec(&path).map_err(|source| SessionError::Load {
                    path: path.clone(),
                    source,
                })?;
                let endpoints = document.endpoints();
                self.loaded = Some(LoadedSpec {
                    path,
                    document,
                    endpoints,
                });
                Ok(SessionState::SelectingEndpoint)
            }

            SessionState::SelectingEndpoint => self.select_endpoint(),

            SessionState::SelectingPreset(endpoint) => self.select_preset(endpoint),

            SessionState::CollectingParams { endpoint, seed } => self.collect_params(endpoint, seed),

            SessionState::Sending {
                endpoint,
                input,
                values,
            } => {
                let method = endpoint.method_upper();
                let body = endpoint.operation.has_body().then(|| input.body_bytes());

                tracing::info!(method = %method, url = %input.url, "Sending request");
                let response = self
                    .transport
                    .send(&method, &input.url, body)
                    .await
                    .map_err(SessionError::Transport)?;
                tracing::info!(status = response.status_code, elapsed = ?response.elapsed, "Response received");

                if values.recording {
                    self.record_preset(&endpoint, &values);
                }

                Ok(SessionState::Displaying(Exchange {
                    request: RequestSummary {
                        method,
                        url: input.url,
                        body: input.raw_body,
                    },
                    response,
                }))
            }

            SessionState::Displaying(exchange) => {
                self.renderer.render(&exchange).map_err(SessionError::Render)?;
                Ok(SessionState::Finished(SessionEnd::Completed))
            }

            SessionState::Finished(end) => Ok(SessionState::Finished(end)),
        }
    }

    fn discover_specs(&mut self) -> Result<SessionState, SessionError> {
        self.candidates = match &self.options.spec {
            Some(spec) => vec![spec.clone()],
            None => discover(&self.options.root, &self.options.patterns)?,
        };
        tracing::info!(count = self.candidates.len(), root = %self.options.root.display(), "Spec discovery");

        match self.candidates.as_slice() {
            [] => Err(SessionError::NoSpecFound {
                root: self.options.root.clone(),
            }),
            [only] => Ok(SessionState::LoadingSpec(only.clone())),
            _ => Ok(SessionState::SelectingSpec),
        }
    }

    fn select_endpoint(&mut self) -> Result<SessionState, SessionError> {
        let Some(loaded) = &self.loaded else {
            return Ok(SessionState::DiscoveringSpec);
        };

        let choice = self
            .prompter
            .select_endpoint(&loaded.path, &loaded.endpoints)
            .map_err(SessionError::Prompt)?;

        match choice {
            EndpointChoice::Selected(index) => {
                let Some(endpoint) = loaded.endpoints.get(index).cloned() else {
                    tracing::warn!(index, "Endpoint index out of range");
                    return Ok(SessionState::SelectingEndpoint);
                };
                tracing::info!(endpoint = %endpoint.title(), "Endpoint selected");

                if self.store.has_presets(&endpoint.method, &endpoint.path) {
                    Ok(SessionState::SelectingPreset(endpoint))
                } else {
                    Ok(SessionState::CollectingParams {
                        endpoint,
                        seed: FormValues::default(),
                    })
                }
            }
            EndpointChoice::SwitchSpec => Ok(SessionState::SelectingSpec),
            EndpointChoice::Quit => Ok(SessionState::Finished(SessionEnd::Canceled)),
        }
    }

    fn select_preset(&mut self, endpoint: Endpoint) -> Result<SessionState, SessionError> {
        let presets = self.store.presets_for(&endpoint.method, &endpoint.path);
        if presets.is_empty() {
            return Ok(SessionState::CollectingParams {
                endpoint,
                seed: FormValues::default(),
            });
        }

        let choice = self
            .prompter
            .select_preset(&endpoint, &presets)
            .map_err(SessionError::Prompt)?;

        Ok(match choice {
            PresetChoice::Fresh => SessionState::CollectingParams {
                endpoint,
                seed: FormValues::default(),
            },
            PresetChoice::Preset(index) => {
                let seed = presets
                    .get(index)
                    .map(StoredParams::to_form_values)
                    .unwrap_or_default();
                SessionState::CollectingParams { endpoint, seed }
            }
            PresetChoice::Back | PresetChoice::Cancel => SessionState::SelectingEndpoint,
            PresetChoice::Quit => SessionState::Finished(SessionEnd::Canceled),
        })
    }

    fn collect_params(&mut self, endpoint: Endpoint, seed: FormValues) -> Result<SessionState, SessionError> {
        let base_url = match &self.loaded {
            Some(loaded) => loaded.document.base_url.clone(),
            None => return Ok(SessionState::DiscoveringSpec),
        };

        let outcome = self
            .prompter
            .collect_params(&endpoint, &seed)
            .map_err(SessionError::Prompt)?;
        let quit = outcome.is_quit();
        let mut provider = outcome.into_provider();

        match assemble(&base_url, &endpoint, &mut provider)? {
            Assembly::Canceled if quit => Ok(SessionState::Finished(SessionEnd::Canceled)),
            Assembly::Canceled => {
                tracing::info!(endpoint = %endpoint.title(), "Parameter entry canceled");
                Ok(SessionState::SelectingEndpoint)
            }
            Assembly::Ready(input) => Ok(SessionState::Sending {
                endpoint,
                input,
                values: provider.into_values(),
            }),
        }
    }

    /// Presets are a convenience; a failed save never fails the request
    fn record_preset(&mut self, endpoint: &Endpoint, values: &FormValues) {
        let preset = StoredParams::capture(endpoint, values);
        if let Err(e) = self.store.append_preset(&endpoint.method, &endpoint.path, &preset) {
            tracing::warn!(error = %e, endpoint = %endpoint.title(), "Failed to save preset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRESET_FILE_NAME;
    use crate::error::LoadError;
    use crate::request::TransportResponse;
    use crate::session::prompter::FormOutcome;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::collections::{BTreeMap, VecDeque};
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    #[derive(Default)]
    struct ScriptedPrompter {
        specs: VecDeque<Option<PathBuf>>,
        endpoints: VecDeque<EndpointChoice>,
        presets: VecDeque<PresetChoice>,
        forms: VecDeque<FormOutcome>,
        seen_candidates: Vec<Vec<PathBuf>>,
        seen_endpoints: Vec<Vec<String>>,
        seen_presets: Vec<usize>,
        seen_seeds: Vec<FormValues>,
    }

    impl Prompter for ScriptedPrompter {
        fn select_spec(&mut self, candidates: &[PathBuf]) -> Result<Option<PathBuf>> {
            self.seen_candidates.push(candidates.to_vec());
            self.specs.pop_front().ok_or_else(|| anyhow!("no scripted spec choice"))
        }

        fn select_endpoint(&mut self, _spec_path: &Path, endpoints: &[Endpoint]) -> Result<EndpointChoice> {
            self.seen_endpoints.push(endpoints.iter().map(|e| e.title()).collect());
            self.endpoints.pop_front().ok_or_else(|| anyhow!("no scripted endpoint choice"))
        }

        fn select_preset(&mut self, _endpoint: &Endpoint, presets: &[StoredParams]) -> Result<PresetChoice> {
            self.seen_presets.push(presets.len());
            self.presets.pop_front().ok_or_else(|| anyhow!("no scripted preset choice"))
        }

        fn collect_params(&mut self, _endpoint: &Endpoint, seed: &FormValues) -> Result<FormOutcome> {
            self.seen_seeds.push(seed.clone());
            self.forms.pop_front().ok_or_else(|| anyhow!("no scripted form outcome"))
        }
    }

    #[derive(Default)]
    struct FakeTransport {
        fail: bool,
        calls: RefCell<Vec<(String, String, Option<Vec<u8>>)>>,
    }

    impl Transport for FakeTransport {
        async fn send(&self, method: &str, url: &str, body: Option<Vec<u8>>) -> Result<TransportResponse> {
            self.calls
                .borrow_mut()
                .push((method.to_string(), url.to_string(), body));
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(TransportResponse {
                status_code: 200,
                status_text: "OK".to_string(),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                elapsed: Duration::from_millis(12),
                raw_body: br#"{"ok":true}"#.to_vec(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        shown: Vec<Exchange>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, exchange: &Exchange) -> Result<()> {
            self.shown.push(exchange.clone());
            Ok(())
        }
    }

    const PING_SPEC: &str = r#"
base_url: https://api.example.com
paths:
  /ping:
    get:
      summary: Ping
"#;

    const USERS_SPEC: &str = r#"
base_url: https://api.example.com
paths:
  /users/{id}:
    get:
      summary: Show user
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
        - name: fields
          in: query
          schema:
            type: string
    put:
      summary: Update user
      parameters:
        - name: id
          in: path
          schema:
            type: integer
      requestBody:
        content:
          application/json:
            schema:
              type: object
"#;

    type TestSession = Session<ScriptedPrompter, FakeTransport, RecordingRenderer>;

    fn session(root: &Path, prompter: ScriptedPrompter) -> TestSession {
        session_with(root, prompter, FakeTransport::default())
    }

    fn session_with(root: &Path, prompter: ScriptedPrompter, transport: FakeTransport) -> TestSession {
        let options = SessionOptions::new(root, vec!["*.yml".to_string()]);
        Session::new(options, prompter, transport, RecordingRenderer::default()).unwrap()
    }

    fn values(path: &[(&str, &str)], query: &[(&str, &str)], body: &str, recording: bool) -> FormValues {
        FormValues {
            path: path.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: body.to_string(),
            recording,
        }
    }

    /// Step from discovery up to the endpoint list of a single-spec root
    async fn at_endpoint_list(session: &mut TestSession) -> SessionState {
        let state = session.step(SessionState::DiscoveringSpec).await.unwrap();
        assert!(matches!(state, SessionState::LoadingSpec(_)));
        let state = session.step(state).await.unwrap();
        assert_eq!(state, SessionState::SelectingEndpoint);
        state
    }

    #[tokio::test]
    async fn test_single_ping_endpoint_end_to_end() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api_spec.yml"), PING_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            forms: VecDeque::from([FormOutcome::Submitted(FormValues::default())]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);

        let end = session.run().await.unwrap();
        assert_eq!(end, SessionEnd::Completed);

        let calls = session.transport().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("GET".to_string(), "https://api.example.com/ping".to_string(), None));

        let shown = &session.renderer().shown;
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].request.url, "https://api.example.com/ping");
        assert_eq!(shown[0].request.body, "");
        assert_eq!(shown[0].response.status_code, 200);

        // one spec: the spec picker is never shown
        assert!(session.prompter().seen_candidates.is_empty());
    }

    #[tokio::test]
    async fn test_two_candidates_enter_spec_selection() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.yml"), PING_SPEC).unwrap();
        std::fs::write(dir.path().join("b.yml"), PING_SPEC).unwrap();

        let mut session = session(dir.path(), ScriptedPrompter::default());
        let state = session.step(SessionState::DiscoveringSpec).await.unwrap();
        assert_eq!(state, SessionState::SelectingSpec);
        assert_eq!(
            session.candidates(),
            &[dir.path().join("a.yml"), dir.path().join("b.yml")]
        );
    }

    #[tokio::test]
    async fn test_no_spec_is_fatal() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path(), ScriptedPrompter::default());
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, SessionError::NoSpecFound { .. }));
    }

    #[tokio::test]
    async fn test_spec_selection_cancel_ends_cleanly() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.yml"), PING_SPEC).unwrap();
        std::fs::write(dir.path().join("b.yml"), PING_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            specs: VecDeque::from([None]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Canceled);
        assert!(session.transport().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_blank_base_url_is_fatal() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("api.yml"),
            "paths:\n  /ping:\n    get:\n      summary: Ping\n",
        )
        .unwrap();

        let mut session = session(dir.path(), ScriptedPrompter::default());
        let err = session.run().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Load {
                source: LoadError::MissingBaseUrl,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_switch_spec_returns_to_spec_selection() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.yml"), PING_SPEC).unwrap();
        std::fs::write(dir.path().join("b.yml"), USERS_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            specs: VecDeque::from([Some(dir.path().join("a.yml")), None]),
            endpoints: VecDeque::from([EndpointChoice::SwitchSpec]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Canceled);

        let seen = &session.prompter().seen_candidates;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn test_endpoint_quit_ends_session() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Quit]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Canceled);
        assert_eq!(
            session.prompter().seen_endpoints[0],
            vec!["GET /users/{id}", "PUT /users/{id}"]
        );
    }

    #[tokio::test]
    async fn test_form_cancel_returns_to_endpoint_list() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            forms: VecDeque::from([FormOutcome::Canceled]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        let state = at_endpoint_list(&mut session).await;

        let state = session.step(state).await.unwrap();
        assert!(matches!(state, SessionState::CollectingParams { .. }));
        let state = session.step(state).await.unwrap();
        assert_eq!(state, SessionState::SelectingEndpoint);
        assert!(session.transport().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_form_quit_ends_session() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(1)]),
            forms: VecDeque::from([FormOutcome::Quit]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Canceled);
        assert!(session.transport().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_path_query_and_body_reach_transport() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(1)]),
            forms: VecDeque::from([FormOutcome::Submitted(values(
                &[("id", "7")],
                &[],
                r#"{"name":"ada"}"#,
                false,
            ))]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Completed);

        let calls = session.transport().calls.borrow();
        assert_eq!(calls[0].0, "PUT");
        assert_eq!(calls[0].1, "https://api.example.com/users/7");
        assert_eq!(calls[0].2.as_deref(), Some(br#"{"name":"ada"}"#.as_slice()));

        // recording was off
        assert!(!dir.path().join(PRESET_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_recording_appends_preset() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            forms: VecDeque::from([FormOutcome::Submitted(values(
                &[("id", "42")],
                &[("fields", "")],
                "",
                true,
            ))]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Completed);

        let store = PresetStore::load(dir.path()).unwrap();
        let presets = store.presets_for("GET", "/users/{id}");
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].path, BTreeMap::from([("id".to_string(), "42".to_string())]));
        assert!(presets[0].query.is_empty());
        assert!(presets[0].recorded_at.is_some());
    }

    #[tokio::test]
    async fn test_preset_selection_seeds_form() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();
        {
            let mut store = PresetStore::load(dir.path()).unwrap();
            let older = StoredParams {
                path: BTreeMap::from([("id".to_string(), "1".to_string())]),
                ..Default::default()
            };
            let newer = StoredParams {
                path: BTreeMap::from([("id".to_string(), "2".to_string())]),
                query: BTreeMap::from([("fields".to_string(), "name".to_string())]),
                ..Default::default()
            };
            store.append_preset("get", "/users/{id}", &older).unwrap();
            store.append_preset("get", "/users/{id}", &newer).unwrap();
        }

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            presets: VecDeque::from([PresetChoice::Preset(1)]),
            forms: VecDeque::from([FormOutcome::Canceled]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        let state = at_endpoint_list(&mut session).await;

        let state = session.step(state).await.unwrap();
        assert!(matches!(state, SessionState::SelectingPreset(_)));
        let state = session.step(state).await.unwrap();
        let SessionState::CollectingParams { seed, .. } = &state else {
            panic!("expected CollectingParams, got {}", state.name());
        };
        assert_eq!(seed.path["id"], "2");
        assert_eq!(seed.query["fields"], "name");
        assert!(!seed.recording);
        assert_eq!(session.prompter().seen_presets, vec![2]);
    }

    #[tokio::test]
    async fn test_preset_back_and_cancel_return_to_endpoints() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();
        PresetStore::load(dir.path())
            .unwrap()
            .append_preset("GET", "/users/{id}", &StoredParams::default())
            .unwrap();

        for choice in [PresetChoice::Back, PresetChoice::Cancel] {
            let prompter = ScriptedPrompter {
                endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
                presets: VecDeque::from([choice]),
                ..Default::default()
            };
            let mut session = session(dir.path(), prompter);
            let state = at_endpoint_list(&mut session).await;
            let state = session.step(state).await.unwrap();
            let state = session.step(state).await.unwrap();
            assert_eq!(state, SessionState::SelectingEndpoint);
        }
    }

    #[tokio::test]
    async fn test_preset_quit_ends_session() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();
        PresetStore::load(dir.path())
            .unwrap()
            .append_preset("GET", "/users/{id}", &StoredParams::default())
            .unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            presets: VecDeque::from([PresetChoice::Quit]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Canceled);
        assert!(session.transport().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_fresh_preset_choice_gives_empty_seed() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), USERS_SPEC).unwrap();
        PresetStore::load(dir.path())
            .unwrap()
            .append_preset("GET", "/users/{id}", &StoredParams {
                body: "x".into(),
                ..Default::default()
            })
            .unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            presets: VecDeque::from([PresetChoice::Fresh]),
            forms: VecDeque::from([FormOutcome::Submitted(values(&[("id", "3")], &[], "", false))]),
            ..Default::default()
        };
        let mut session = session(dir.path(), prompter);
        assert_eq!(session.run().await.unwrap(), SessionEnd::Completed);
        assert_eq!(session.prompter().seen_seeds, vec![FormValues::default()]);
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("api.yml"), PING_SPEC).unwrap();

        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            forms: VecDeque::from([FormOutcome::Submitted(values(&[], &[], "", true))]),
            ..Default::default()
        };
        let transport = FakeTransport {
            fail: true,
            ..Default::default()
        };
        let mut session = session_with(dir.path(), prompter, transport);
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert!(session.renderer().shown.is_empty());
        // nothing recorded for a failed send
        assert!(!dir.path().join(PRESET_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_preset_save_failure_does_not_fail_request() {
        let spec_dir = tempdir().unwrap();
        let spec = spec_dir.path().join("api.yml");
        std::fs::write(&spec, PING_SPEC).unwrap();

        let root = tempdir().unwrap();
        let root_path = root.path().to_path_buf();
        let options = SessionOptions::new(&root_path, vec![]).with_spec(&spec);
        let prompter = ScriptedPrompter {
            endpoints: VecDeque::from([EndpointChoice::Selected(0)]),
            forms: VecDeque::from([FormOutcome::Submitted(values(&[], &[], "", true))]),
            ..Default::default()
        };
        let mut session = Session::new(options, prompter, FakeTransport::default(), RecordingRenderer::default()).unwrap();

        // the preset file can no longer be written
        root.close().unwrap();

        assert_eq!(session.run().await.unwrap(), SessionEnd::Completed);
        assert_eq!(session.renderer().shown.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_preset_file_is_fatal() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PRESET_FILE_NAME), "[oops").unwrap();
        let options = SessionOptions::new(dir.path(), vec![]);
        let result = Session::new(
            options,
            ScriptedPrompter::default(),
            FakeTransport::default(),
            RecordingRenderer::default(),
        );
        assert!(matches!(result, Err(SessionError::Presets(_))));
    }
}
