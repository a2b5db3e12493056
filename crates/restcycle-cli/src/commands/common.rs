use restcycle_core::{
    Config, ConsolePresenter, Event, HttpBackend, Presenter, PresenterChain, WebhookPresenter,
};

/// Flag wins, then the configured default.
pub fn resolve_username(
    flag: Option<String>,
    config: &Config,
) -> Result<String, Box<dyn std::error::Error>> {
    flag.or_else(|| config.username.clone()).ok_or_else(|| {
        "no username given: pass --username or run `restcycle config set username <name>`".into()
    })
}

pub fn build_backend(config: &Config) -> Result<HttpBackend, Box<dyn std::error::Error>> {
    Ok(HttpBackend::new(&config.backend.base_url)?)
}

/// Webhook first when configured (the out-of-band channel), terminal
/// banner as the floor. Disabled notifications yield an empty chain,
/// which presents nothing and fails nothing.
pub fn build_presenter(config: &Config) -> PresenterChain {
    let mut transports: Vec<Box<dyn Presenter>> = Vec::new();
    if config.notifications.enabled {
        if let Some(url) = &config.notifications.webhook_url {
            match WebhookPresenter::new(url.clone()) {
                Ok(webhook) => transports.push(Box::new(webhook)),
                Err(e) => log::warn!("webhook presenter unavailable: {e}"),
            }
        }
        transports.push(Box::new(ConsolePresenter));
    }
    PresenterChain::new(transports)
}

pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
