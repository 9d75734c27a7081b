//! Provider Factory Integration Tests
//!
//! Provider construction from configuration, and the provider check
//! against an address nothing listens on.

use test_triage::commands::providers::check_provider;
use test_triage::models::settings::AppConfig;
use test_triage::ConfigService;
use test_triage_llm::{create_provider, ProviderConfig, ProviderSetupError, ProviderType};

#[test]
fn test_hosted_providers_require_credentials() {
    for provider in [ProviderType::OpenAI, ProviderType::Gemini, ProviderType::Groq] {
        let err = create_provider(&ProviderConfig::new(provider)).err().unwrap();
        assert!(
            matches!(err, ProviderSetupError::Configuration { .. }),
            "{provider} built without a credential"
        );
    }
}

#[test]
fn test_ollama_builds_without_credential() {
    let provider = create_provider(&ProviderConfig::new(ProviderType::Ollama)).unwrap();
    assert_eq!(provider.name(), "ollama");
    assert_eq!(provider.model(), "llama3");
}

#[test]
fn test_selector_is_case_insensitive() {
    assert_eq!("GROQ".parse::<ProviderType>().unwrap(), ProviderType::Groq);
    assert_eq!("OpenAI".parse::<ProviderType>().unwrap(), ProviderType::OpenAI);
}

#[test]
fn test_unknown_selector() {
    let err = "mistral".parse::<ProviderType>().unwrap_err();
    assert!(matches!(err, ProviderSetupError::UnsupportedProvider(ref s) if s == "mistral"));
}

#[test]
fn test_temperature_out_of_range() {
    let mut config = ProviderConfig::new(ProviderType::Ollama);
    config.temperature = 1.5;
    assert!(create_provider(&config).is_err());
}

#[test]
fn test_config_file_drives_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[AI]\nPROVIDER = \"groq\"\nGROQ_MODEL = \"llama-3.1-8b-instant\"\nMAX_TOKENS = 512\n",
    )
    .unwrap();

    let service = ConfigService::load(&path).unwrap();
    let config = service
        .provider_config_with(None, |name| {
            (name == "GROQ_API_KEY").then(|| "gsk-test".to_string())
        })
        .unwrap();

    assert_eq!(config.max_tokens, 512);
    let provider = create_provider(&config).unwrap();
    assert_eq!(provider.name(), "groq");
    assert_eq!(provider.model(), "llama-3.1-8b-instant");
    assert_eq!(provider.config().temperature, 0.5);
    assert_ne!(service.get_config(), &AppConfig::default());
}

#[tokio::test]
async fn test_check_reports_unreachable_ollama() {
    let mut config = ProviderConfig::new(ProviderType::Ollama).with_base_url("http://127.0.0.1:9");
    config.timeout_secs = 5;
    let provider = create_provider(&config).unwrap();

    let status = check_provider(provider.as_ref()).await;

    assert_eq!(status.provider, "ollama");
    assert!(!status.healthy);
    assert!(status.error.is_some());
    assert!(status.models.is_none());
}
