//! Entwine demo console entry point.
//!
//! Registers a small demo service, loads the service configuration, builds
//! the interception chains it declares, and calls the demo method twice to
//! show the memoized second call.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use entwine::domain::models::invocation::{CachePolicy, InterfaceDescriptor, Invocation};
use entwine::{
    CachingBehaviorFactory, Callable, CapabilityMap, ChainBuilder, Config, ConfigLoader,
    ConsoleSink, Dispatcher, LoggingBehaviorFactory, MemoryCacheStore, ServiceDescriptor,
    ServiceRegistry, TraceSink,
};

const DEMO_INTERFACE: &str = "demo.Demo";
const DEMO_IMPLEMENTATION: &str = "demo.DemoManager";

#[derive(Parser, Debug)]
#[command(name = "entwine", about = "Interception chain demo", version)]
struct Cli {
    /// Path to the service configuration file.
    #[arg(long, default_value = "entwine.yaml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ConfigLoader::load_from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if config.services.is_empty() {
        config = demo_config();
        info!("no services configured; using the built-in demo registration");
    }

    let mut registry = demo_registry();
    registry.apply_cache_policies(&config.cache_policies)?;

    let mut resolver = CapabilityMap::new();
    resolver.provide::<Arc<dyn entwine::CacheStore>>(Arc::new(MemoryCacheStore::new()));
    resolver.provide::<Arc<dyn TraceSink>>(Arc::new(ConsoleSink));

    let builder = ChainBuilder::new(Arc::new(registry), Arc::new(resolver));

    // A minimal provider: build every declared chain up front. Lifetime
    // handling beyond that belongs to a real container.
    let mut provider: HashMap<String, Arc<dyn Callable>> = HashMap::new();
    for (lifetime, descriptor) in config.services.iter() {
        info!(interface = %descriptor.interface, %lifetime, "building chain");
        let chain = builder.build(descriptor)?;
        provider.insert(descriptor.interface.clone(), chain);
    }

    let demo = provider
        .get(DEMO_INTERFACE)
        .with_context(|| format!("no {DEMO_INTERFACE} service configured"))?;
    let run = demo_interface()
        .method("run")
        .context("demo interface lost its run method")?
        .clone();

    for args in [vec![json!(2), json!([1, 2, 3])], vec![json!(2), json!([1, 2, 3])]] {
        let value = demo.call(&Invocation::new(run.clone(), args))?;
        println!("{} {value}", style("Value returned:").green().bold());
    }

    Ok(())
}

fn demo_interface() -> InterfaceDescriptor {
    InterfaceDescriptor::builder(DEMO_INTERFACE)
        .cached_method("run", &["value", "more"], CachePolicy::with_key("someKey"))
        .build()
}

/// Registry holding the demo interface, its implementation, and both
/// stock behaviors.
fn demo_registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register_interface(demo_interface());
    registry.register_implementation(
        DEMO_IMPLEMENTATION,
        DEMO_INTERFACE,
        vec![],
        |_dependencies| {
            let dispatcher = Dispatcher::new(Arc::new(demo_interface())).handle("run", |args| {
                info!("actual work");
                let value = entwine::domain::models::invocation::int_arg("run", args, 0)?;
                Ok(json!(15 * value))
            });
            Ok(Arc::new(dispatcher))
        },
    );
    registry.register_behavior(CachingBehaviorFactory);
    registry.register_behavior(LoggingBehaviorFactory);
    registry
}

fn demo_config() -> Config {
    let mut config = Config::default();
    config.services.singleton.push(ServiceDescriptor {
        interface: DEMO_INTERFACE.to_string(),
        implementation: DEMO_IMPLEMENTATION.to_string(),
        interception_behaviors: vec!["Caching".to_string(), "Logging".to_string()],
    });
    config
}
