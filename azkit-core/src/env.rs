//! Host environment lookups.
//!
//! [`Env`] reads process environment variables with defaults and composes the
//! connection strings used by the various Azure services. Azure variables can
//! be namespaced with the `AZURE_ENV_PREFIX` variable (e.g. `MSFT_`,
//! `PERS_`), so switching between environments only takes one variable.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Namespace for environment and command-line lookups.
pub struct Env;

macro_rules! azure_getters {
    (@default $default:literal) => { Some($default) };
    (@default) => { None };
    ($($fn_name:ident => $var:literal $(, default = $default:literal)?;)*) => {
        impl Env {
            $(
                #[doc = concat!("Value of the prefixed `", $var, "` variable.")]
                pub fn $fn_name() -> Option<String> {
                    Env::azure_envvar($var, azure_getters!(@default $($default)?))
                }
            )*
        }
    };
}

impl Env {
    /// The value of `name`, or `default` when it is not set.
    pub fn envvar(name: &str, default: Option<&str>) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(_) => default.map(str::to_string),
        }
    }

    /// Prefix for project-specific Azure variables; empty when unset.
    pub fn azure_env_prefix() -> String {
        Env::envvar("AZURE_ENV_PREFIX", Some("")).unwrap_or_default()
    }

    /// Look up `name` with the [`Env::azure_env_prefix`] prepended.
    pub fn azure_envvar(name: &str, default: Option<&str>) -> Option<String> {
        let prefixed = format!("{}{}", Env::azure_env_prefix(), name);
        Env::envvar(prefixed.trim(), default)
    }

    /// Whether `flag` appears among the process arguments.
    pub fn boolean_arg(flag: &str) -> bool {
        let args: Vec<String> = std::env::args().collect();
        Env::boolean_arg_in(&args, flag)
    }

    pub fn boolean_arg_in<S: AsRef<str>>(args: &[S], flag: &str) -> bool {
        args.iter().any(|a| a.as_ref() == flag)
    }

    pub fn verbose() -> bool {
        Env::boolean_arg("--verbose")
    }

    pub fn verbose_in<S: AsRef<str>>(args: &[S]) -> bool {
        Env::boolean_arg_in(args, "--verbose")
    }

    /// `USERNAME` on Windows, `USER` on macOS and Linux.
    pub fn username() -> Option<String> {
        Env::envvar("USERNAME", None).or_else(|| Env::envvar("USER", None))
    }

    /// Seconds since the Unix epoch.
    pub fn epoch() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }

    pub fn mongodb_conn_str() -> Option<String> {
        Env::envvar("MONGO_CONN_STR", None)
    }

    pub fn redis_host() -> String {
        Env::envvar("REDIS_HOST", Some("127.0.0.1")).unwrap_or_default()
    }

    pub fn redis_port() -> String {
        Env::envvar("REDIS_PORT", Some("6379")).unwrap_or_default()
    }

    /// libpq-style connection string for Azure PostgreSQL Flexible Server.
    pub fn azure_pg_connection_str() -> String {
        format!(
            "host={} port={} dbname={} user={} password={} ",
            Env::azure_pg_flex_server().unwrap_or_default(),
            Env::azure_pg_flex_port().unwrap_or_default(),
            Env::azure_pg_flex_db().unwrap_or_default(),
            Env::azure_pg_flex_user().unwrap_or_default(),
            Env::azure_pg_flex_pass().unwrap_or_default(),
        )
    }

    /// SQLAlchemy engine URL for the same database.
    pub fn azure_pg_sqlalchemy_engine_url() -> String {
        format!(
            "postgresql+psycopg://{}:{}@{}:{}/{}",
            Env::azure_pg_flex_user().unwrap_or_default(),
            Env::azure_pg_flex_pass().unwrap_or_default(),
            Env::azure_pg_flex_server().unwrap_or_default(),
            Env::azure_pg_flex_port().unwrap_or_default(),
            Env::azure_pg_flex_db().unwrap_or_default(),
        )
    }

    pub fn azure_pg_sqlalchemy_pool_size() -> u32 {
        Env::azure_int("AZURE_PG_SQLALCHEMY_POOL_SIZE", 3)
    }

    pub fn azure_pg_sqlalchemy_max_overflow() -> u32 {
        Env::azure_int("AZURE_PG_SQLALCHEMY_MAX_OVERFLOW", 0)
    }

    fn azure_int(name: &str, default: u32) -> u32 {
        let Some(raw) = Env::azure_envvar(name, None) else {
            return default;
        };
        match raw.trim().parse::<u32>() {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, var = name, raw = %raw, default, "Not an integer, using default");
                default
            }
        }
    }

    /// File types accepted by Azure Document Intelligence, sorted.
    pub fn document_intelligence_supported_filetypes() -> Vec<String> {
        let general_types = "pdf,html";
        let images_types = "jpeg,jpg,png,bmp,heif,tiff";
        let ms_office_types = "docx,xlsx,pptx";
        let mut types: Vec<String> = [general_types, images_types, ms_office_types]
            .join(",")
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .collect();
        types.sort();
        types
    }

    /// Well-known variables and what they are for.
    pub fn standard_env_vars() -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            ("AZURE_COSMOSDB_NOSQL_ACCT", "AZURE_COSMOS DB NoSQL account name"),
            ("AZURE_COSMOSDB_NOSQL_URI", "AZURE_COSMOS DB NoSQL account URI"),
            ("AZURE_COSMOSDB_NOSQL_KEY", "AZURE_COSMOS DB NoSQL account key"),
            ("AZURE_COSMOSDB_NOSQL_AUTHTYPE", "Authentication mechanism; key or rbac."),
            ("AZURE_COSMOSDB_NOSQL_DEFAULT_DB", "AZURE_COSMOS DB NoSQL default database"),
            ("AZURE_COSMOSDB_NOSQL_DEFAULT_CONTAINER", "AZURE_COSMOS DB NoSQL default container"),
            ("LOG_LEVEL", "A standard logging level name."),
            ("MONGO_CONN_STR", "MongoDB connection string for MongoDB or Cosmos DB Mongo vCore, or the emulator"),
            ("REDIS_HOST", "Redis Cache host, defaults to 127.0.0.1"),
            ("REDIS_PORT", "Redis Cache port, defaults to 6379"),
        ])
    }

    pub fn log_standard_env_vars() -> bool {
        for name in Env::standard_env_vars().keys() {
            let value = Env::envvar(name, None);
            warn!(var = name, value = ?value, "envvar");
        }
        true
    }

    /// Pin the variables the test-suite relies on.
    pub fn set_unit_testing_environment() -> bool {
        let vars = [
            ("AZURE_COSMOSDB_NOSQL_AUTHTYPE", "key"),
            ("AZURE_COSMOSDB_NOSQL_DEFAULT_DB", "dev"),
            ("AZURE_COSMOSDB_NOSQL_DEFAULT_CONTAINER", "test"),
            ("MONGO_CONN_STR", "emulator"),
            ("REDIS_HOST", "127.0.0.1"),
            ("REDIS_PORT", "6379"),
        ];
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        true
    }
}

azure_getters! {
    azure_ai_search_key => "AZURE_AI_SEARCH_KEY";
    azure_ai_search_name => "AZURE_AI_SEARCH_NAME";
    azure_ai_search_query_key => "AZURE_AI_SEARCH_QUERY_KEY";
    azure_ai_search_region => "AZURE_AI_SEARCH_REGION", default = "eastus";
    azure_ai_search_url => "AZURE_AI_SEARCH_URL";
    azure_ai_search_version => "AZURE_AI_SEARCH_VERSION", default = "2025-09-01";
    azure_app_insights_app => "AZURE_APP_INSIGHTS_APP";
    azure_app_insights_connection_string => "AZURE_APP_INSIGHTS_CONNECTION_STRING";
    azure_app_insights_instrumentation_key => "AZURE_APP_INSIGHTS_INSTRUMENTATION_KEY";
    azure_app_insights_key => "AZURE_APP_INSIGHTS_KEY";
    azure_cosmosdb_emulator_acct => "AZURE_COSMOSDB_EMULATOR_ACCT", default = "localhost:8081";
    azure_cosmosdb_emulator_key => "AZURE_COSMOSDB_EMULATOR_KEY", default = "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";
    azure_cosmosdb_emulator_uri => "AZURE_COSMOSDB_EMULATOR_URI", default = "https://localhost:8081/";
    azure_cosmosdb_nosql_acct => "AZURE_COSMOSDB_NOSQL_ACCT";
    azure_cosmosdb_nosql_authtype => "AZURE_COSMOSDB_NOSQL_AUTHTYPE", default = "key";
    azure_cosmosdb_nosql_conn_str => "AZURE_COSMOSDB_NOSQL_CONN_STR";
    azure_cosmosdb_nosql_key => "AZURE_COSMOSDB_NOSQL_KEY";
    azure_cosmosdb_nosql_uri => "AZURE_COSMOSDB_NOSQL_URI";
    azure_default_region => "AZURE_DEFAULT_REGION", default = "eastus";
    azure_directory => "AZURE_DIRECTORY";
    azure_docintel_acct => "AZURE_DOCINTEL_ACCT";
    azure_docintel_key => "AZURE_DOCINTEL_KEY";
    azure_docintel_region => "AZURE_DOCINTEL_REGION", default = "eastus";
    azure_docintel_url => "AZURE_DOCINTEL_URL";
    azure_foundry_aisvcs_url => "AZURE_FOUNDRY_AISVCS_URL";
    azure_foundry_customvoice_url => "AZURE_FOUNDRY_CUSTOMVOICE_URL";
    azure_foundry_doctrans_url => "AZURE_FOUNDRY_DOCTRANS_URL";
    azure_foundry_key => "AZURE_FOUNDRY_KEY";
    azure_foundry_key2 => "AZURE_FOUNDRY_KEY2";
    azure_foundry_name => "AZURE_FOUNDRY_NAME";
    azure_foundry_oai_dalleapi => "AZURE_FOUNDRY_OAI_DALLEAPI";
    azure_foundry_oai_langapi_url => "AZURE_FOUNDRY_OAI_LANGAPI_URL";
    azure_foundry_oai_url => "AZURE_FOUNDRY_OAI_URL";
    azure_foundry_oai_whisperapi_url => "AZURE_FOUNDRY_OAI_WHISPERAPI_URL";
    azure_foundry_openai_url => "AZURE_FOUNDRY_OPENAI_URL";
    azure_foundry_project1_key => "AZURE_FOUNDRY_PROJECT1_KEY";
    azure_foundry_project_key => "AZURE_FOUNDRY_PROJECT_KEY";
    azure_foundry_project_name => "AZURE_FOUNDRY_PROJECT_NAME";
    azure_foundry_project_url => "AZURE_FOUNDRY_PROJECT_URL";
    azure_foundry_region => "AZURE_FOUNDRY_REGION", default = "eastus";
    azure_foundry_rg => "AZURE_FOUNDRY_RG";
    azure_foundry_speech2text_url => "AZURE_FOUNDRY_SPEECH2TEXT_URL";
    azure_foundry_text2speech_url => "AZURE_FOUNDRY_TEXT2SPEECH_URL";
    azure_foundry_texttrans_url => "AZURE_FOUNDRY_TEXTTRANS_URL";
    azure_foundry_url => "AZURE_FOUNDRY_URL";
    azure_langservice_acct => "AZURE_LANGSERVICE_ACCT";
    azure_langservice_key => "AZURE_LANGSERVICE_KEY";
    azure_langservice_region => "AZURE_LANGSERVICE_REGION", default = "eastus";
    azure_langservice_url => "AZURE_LANGSERVICE_URL";
    azure_mongo_utils_data_dir => "AZURE_MONGO_UTILS_DATA_DIR";
    azure_openai_completions_dep => "AZURE_OPENAI_COMPLETIONS_DEP";
    azure_openai_completions_key => "AZURE_OPENAI_COMPLETIONS_KEY";
    azure_openai_completions_url => "AZURE_OPENAI_COMPLETIONS_URL";
    azure_openai_embeddings_dep => "AZURE_OPENAI_EMBEDDINGS_DEP";
    azure_openai_embeddings_key => "AZURE_OPENAI_EMBEDDINGS_KEY";
    azure_openai_embeddings_url => "AZURE_OPENAI_EMBEDDINGS_URL";
    azure_openai_key => "AZURE_OPENAI_KEY";
    azure_openai_name => "AZURE_OPENAI_NAME";
    azure_openai_region => "AZURE_OPENAI_REGION", default = "eastus";
    azure_openai_url => "AZURE_OPENAI_URL";
    azure_pg_flex_db => "AZURE_PG_FLEX_DB";
    azure_pg_flex_pass => "AZURE_PG_FLEX_PASS";
    azure_pg_flex_port => "AZURE_PG_FLEX_PORT", default = "5432";
    azure_pg_flex_server => "AZURE_PG_FLEX_SERVER";
    azure_pg_flex_user => "AZURE_PG_FLEX_USER";
    azure_rediscache_conn_string => "AZURE_REDISCACHE_CONN_STRING";
    azure_rediscache_host => "AZURE_REDISCACHE_HOST";
    azure_rediscache_key => "AZURE_REDISCACHE_KEY";
    azure_rediscache_namespace => "AZURE_REDISCACHE_NAMESPACE";
    azure_rediscache_port => "AZURE_REDISCACHE_PORT", default = "6380";
    azure_rg => "AZURE_RG";
    azure_storage_account => "AZURE_STORAGE_ACCOUNT";
    azure_storage_conn_string => "AZURE_STORAGE_CONN_STRING";
    azure_storage_key => "AZURE_STORAGE_KEY";
    azure_subscription_id => "AZURE_SUBSCRIPTION_ID";
    azure_subscription_name => "AZURE_SUBSCRIPTION_NAME";
}
