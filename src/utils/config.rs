#![forbid(unsafe_code)]

use log::{error, info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use poem::http::HeaderValue;

use crate::utils::challenge::BasicChallenge;
use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Networking.  None of these are configurable.
const DEFAULT_HTTP_ADDR    : &str = "127.0.0.1";
const DEFAULT_HTTP_PORT    : u16  = 1337;

// Response content.
const DEFAULT_REALM        : &str = "Test";
const DEFAULT_BODY         : &str = "Hello World\n";

// Logging.
const LOG_APPENDER         : &str = "stderr";
const LOG_PATTERN          : &str = "{d(%Y-%m-%dT%H:%M:%S%.3f%z)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct RuntimeCtx {
    pub config: Config,
    pub challenge: HeaderValue,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub http_addr: String,
    pub http_port: u16,
    pub realm: String,
    pub body: String,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    /// Socket address the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http_addr, self.http_port)
    }

    /// URL announced on standard output once the listener is bound.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.listen_addr())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            realm: DEFAULT_REALM.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Install log4rs with a single console appender on stderr.  Standard output
 * is reserved for the startup announcement.
 */
pub fn init_log() -> Result<(), Errors> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let logconfig = log4rs::Config::builder()
        .appender(Appender::builder().build(LOG_APPENDER, Box::new(stderr)))
        .build(Root::builder().appender(LOG_APPENDER).build(LevelFilter::Info))
        .map_err(|e| Errors::Log4rsInitialization(e.to_string()))?;

    log4rs::init_config(logconfig)
        .map_err(|e| Errors::Log4rsInitialization(e.to_string()))?;
    info!("Log4rs initialized using the {} appender.", LOG_APPENDER);
    Ok(())
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
/** Assemble the fixed configuration and render the challenge header once. */
pub fn init_runtime_context() -> RuntimeCtx {
    let config = Config::new();
    let challenge = render_challenge(&config.realm)
        .expect("FAILED to render the WWW-Authenticate challenge.");
    RuntimeCtx { config, challenge }
}

// ---------------------------------------------------------------------------
// render_challenge:
// ---------------------------------------------------------------------------
/** Render the Basic challenge for the realm.  A realm that cannot be carried
 * in a header is logged and the bare challenge without a realm is used.
 */
pub fn render_challenge(realm: &str) -> Result<HeaderValue, Errors> {
    BasicChallenge::with_realm(realm.to_string())
        .to_header_value()
        .or_else(|e| {
            error!("{}", e);
            BasicChallenge::new().to_header_value()
        })
}
