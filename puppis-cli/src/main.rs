use std::collections::HashMap;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

use puppis_core::differ::create_plan;
use puppis_core::effect::Effect;
use puppis_core::plan::Plan;
use puppis_core::provider::Provider;
use puppis_core::resource::{Resource, ResourceId, State, Value};
use puppis_core::schema::ResourceSchema;
use puppis_provider_awx::{AwxProvider, registry};
use puppis_state::{ResourceState, StateBackend, StateFile, create_backend};

mod bindings;
mod manifest;

use bindings::BindingMap;
use manifest::Manifest;

#[derive(Parser)]
#[command(name = "puppis")]
#[command(about = "Declarative management of AWX resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the manifest file
    Validate {
        /// Path to manifest file
        #[arg(default_value = "puppis.yaml")]
        file: PathBuf,
    },
    /// Show execution plan without applying changes
    Plan {
        /// Path to manifest file
        #[arg(default_value = "puppis.yaml")]
        file: PathBuf,
    },
    /// Apply changes to reach the desired state
    Apply {
        /// Path to manifest file
        #[arg(default_value = "puppis.yaml")]
        file: PathBuf,
    },
    /// Destroy every resource recorded in state
    Destroy {
        /// Path to manifest file
        #[arg(default_value = "puppis.yaml")]
        file: PathBuf,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Plan { file } => run_plan(&file).await,
        Commands::Apply { file } => run_apply(&file).await,
        Commands::Destroy { file, auto_approve } => run_destroy(&file, auto_approve).await,
        Commands::Completions { shell } => run_completions(shell),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logging goes to stderr so plan output on stdout stays clean.
/// `RUST_LOG` overrides the warn default.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn get_schemas() -> HashMap<String, ResourceSchema> {
    let mut all_schemas = HashMap::new();
    for schema in registry::schemas() {
        all_schemas.insert(schema.resource_type.clone(), schema);
    }
    all_schemas
}

fn validate_resources(resources: &[Resource]) -> Result<(), String> {
    let schemas = get_schemas();
    let mut all_errors = Vec::new();

    for resource in resources {
        match schemas.get(&resource.id.resource_type) {
            Some(schema) => {
                if let Err(errors) = schema.validate(&resource.attributes) {
                    for error in errors {
                        all_errors.push(format!(
                            "{}.{}: {}",
                            resource.id.resource_type, resource.id.name, error
                        ));
                    }
                }
            }
            None => all_errors.push(format!(
                "{}.{}: Unknown resource type",
                resource.id.resource_type, resource.id.name
            )),
        }
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors.join("\n"))
    }
}

fn run_validate(file: &PathBuf) -> Result<(), String> {
    let manifest = Manifest::load(file).map_err(|e| e.to_string())?;
    let resources = manifest.to_resources().map_err(|e| e.to_string())?;

    println!("{}", "Validating...".cyan());

    validate_resources(&resources)?;

    println!(
        "{}",
        format!("✓ {} blocks validated successfully.", resources.len())
            .green()
            .bold()
    );

    for resource in &resources {
        println!("  • {}.{}", resource.id.resource_type, resource.id.name);
    }

    Ok(())
}

async fn run_plan(file: &PathBuf) -> Result<(), String> {
    let manifest = Manifest::load(file).map_err(|e| e.to_string())?;
    let resources = manifest.to_resources().map_err(|e| e.to_string())?;
    validate_resources(&resources)?;

    let provider = build_provider(&manifest)?;
    let backend = open_backend(&manifest)?;
    let state = load_state(backend.as_ref()).await?;

    let prepared = prepare_plan(&provider, &state, &resources).await?;
    print_plan(&prepared.plan);
    Ok(())
}

async fn run_apply(file: &PathBuf) -> Result<(), String> {
    let manifest = Manifest::load(file).map_err(|e| e.to_string())?;
    let resources = manifest.to_resources().map_err(|e| e.to_string())?;
    validate_resources(&resources)?;

    let provider = build_provider(&manifest)?;
    let backend = open_backend(&manifest)?;

    let lock = backend
        .acquire_lock("apply")
        .await
        .map_err(|e| format!("Failed to lock state: {}", e))?;

    let result = apply_locked(&provider, backend.as_ref(), &resources).await;

    if let Err(e) = backend.release_lock(&lock).await {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    result
}

async fn apply_locked(
    provider: &AwxProvider,
    backend: &dyn StateBackend,
    resources: &[Resource],
) -> Result<(), String> {
    let mut state = load_state(backend).await?;
    let prepared = prepare_plan(provider, &state, resources).await?;
    let plan = prepared.plan;
    let mut bindings = prepared.bindings;

    if plan.mutation_count() == 0 {
        println!("{}", "No changes needed.".green());
        return Ok(());
    }

    print_plan(&plan);
    println!();

    println!("{}", "Applying changes...".cyan().bold());
    println!();

    let mut success_count = 0;
    let mut failure_count = 0;

    // Apply each effect in order, resolving references against bindings
    // updated by earlier effects.
    for effect in plan.effects() {
        match effect {
            // Data sources were already resolved while planning; their
            // attributes are in the binding map.
            Effect::Read(_) => {}
            Effect::Create(resource) => {
                let resolved = bindings::resolve_resource(resource, &bindings);
                if report_unresolved(&resolved, effect) {
                    failure_count += 1;
                    continue;
                }

                match provider.create(&resolved).await {
                    Ok(new_state) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;
                        bindings::rebind_applied(&mut bindings, &resolved, &new_state);
                        record_applied(&mut state, &resolved, &new_state, provider.name());
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
            Effect::Update { id, from, to } => {
                let resolved = bindings::resolve_resource(to, &bindings);
                if report_unresolved(&resolved, effect) {
                    failure_count += 1;
                    continue;
                }

                let Some(identifier) = from.identifier.clone() else {
                    println!(
                        "  {} {} - no identifier recorded in state",
                        "✗".red(),
                        format_effect(effect)
                    );
                    failure_count += 1;
                    continue;
                };

                match provider.update(id, &identifier, from, &resolved).await {
                    Ok(new_state) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;
                        bindings::rebind_applied(&mut bindings, &resolved, &new_state);
                        record_applied(&mut state, &resolved, &new_state, provider.name());
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
            Effect::Replace { id, from, to } => {
                let resolved = bindings::resolve_resource(to, &bindings);
                if report_unresolved(&resolved, effect) {
                    failure_count += 1;
                    continue;
                }

                let Some(identifier) = from.identifier.clone() else {
                    println!(
                        "  {} {} - no identifier recorded in state",
                        "✗".red(),
                        format_effect(effect)
                    );
                    failure_count += 1;
                    continue;
                };

                if let Err(e) = provider.delete(id, &identifier).await {
                    println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                    failure_count += 1;
                    continue;
                }
                state.remove_resource(&id.resource_type, &id.name);

                match provider.create(&resolved).await {
                    Ok(new_state) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;
                        bindings::rebind_applied(&mut bindings, &resolved, &new_state);
                        record_applied(&mut state, &resolved, &new_state, provider.name());
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
            Effect::Delete(id) => {
                let identifier = state
                    .find_resource(&id.resource_type, &id.name)
                    .and_then(|r| r.identifier.clone());

                let outcome = match &identifier {
                    Some(identifier) => provider.delete(id, identifier).await,
                    // Never created remotely; only the record goes away.
                    None => Ok(()),
                };

                match outcome {
                    Ok(()) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;
                        state.remove_resource(&id.resource_type, &id.name);
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
        }
    }

    // Partial failures still leave the state file reflecting what landed.
    state.increment_serial();
    backend
        .write_state(&state)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))?;

    println!();
    if failure_count == 0 {
        println!(
            "{}",
            format!("Apply complete! {} changes applied.", success_count)
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "Apply failed. {} succeeded, {} failed.",
                success_count, failure_count
            )
            .red()
            .bold()
        );
    }

    Ok(())
}

async fn run_destroy(file: &PathBuf, auto_approve: bool) -> Result<(), String> {
    let manifest = Manifest::load(file).map_err(|e| e.to_string())?;
    let provider = build_provider(&manifest)?;
    let backend = open_backend(&manifest)?;

    let lock = backend
        .acquire_lock("destroy")
        .await
        .map_err(|e| format!("Failed to lock state: {}", e))?;

    let result = destroy_locked(&provider, backend.as_ref(), auto_approve).await;

    if let Err(e) = backend.release_lock(&lock).await {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    result
}

async fn destroy_locked(
    provider: &AwxProvider,
    backend: &dyn StateBackend,
    auto_approve: bool,
) -> Result<(), String> {
    let mut state = load_state(backend).await?;

    if state.resources.is_empty() {
        println!("{}", "No resources to destroy.".green());
        return Ok(());
    }

    // Teardown runs in reverse creation order.
    let targets: Vec<(ResourceId, Option<String>)> = state
        .resources
        .iter()
        .rev()
        .map(|r| {
            (
                ResourceId::new(r.resource_type.clone(), r.name.clone()),
                r.identifier.clone(),
            )
        })
        .collect();

    println!("{}", "Destroy Plan:".red().bold());
    println!();

    for (id, _) in &targets {
        println!("  {} {}.{}", "-".red().bold(), id.resource_type, id.name);
    }

    println!();
    println!("Plan: {} to destroy.", targets.len().to_string().red());
    println!();

    if !auto_approve {
        println!(
            "{}",
            "Do you really want to destroy all resources?"
                .yellow()
                .bold()
        );
        println!(
            "  {}",
            "This action cannot be undone. Type 'yes' to confirm.".yellow()
        );
        print!("\n  Enter a value: ");
        std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| e.to_string())?;

        if input.trim() != "yes" {
            println!();
            println!("{}", "Destroy cancelled.".yellow());
            return Ok(());
        }
        println!();
    }

    println!("{}", "Destroying resources...".red().bold());
    println!();

    let mut success_count = 0;
    let mut failure_count = 0;

    for (id, identifier) in targets {
        let effect = Effect::Delete(id.clone());
        let outcome = match &identifier {
            Some(identifier) => provider.delete(&id, identifier).await,
            // Never created remotely; only the record goes away.
            None => Ok(()),
        };

        match outcome {
            Ok(()) => {
                println!("  {} {}", "✓".green(), format_effect(&effect));
                success_count += 1;
                state.remove_resource(&id.resource_type, &id.name);
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), format_effect(&effect), e);
                failure_count += 1;
            }
        }
    }

    state.increment_serial();
    backend
        .write_state(&state)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))?;

    println!();
    if failure_count == 0 {
        println!(
            "{}",
            format!("Destroy complete! {} resources destroyed.", success_count)
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "Destroy failed. {} succeeded, {} failed.",
                success_count, failure_count
            )
            .red()
            .bold()
        );
    }

    Ok(())
}

fn run_completions(shell: Shell) -> Result<(), String> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}

fn build_provider(manifest: &Manifest) -> Result<AwxProvider, String> {
    let config = manifest
        .connection
        .to_awx_config(std::env::var("PUPPIS_AWX_TOKEN").ok())
        .map_err(|e| e.to_string())?;
    AwxProvider::new(config).map_err(|e| e.to_string())
}

fn open_backend(manifest: &Manifest) -> Result<Box<dyn StateBackend>, String> {
    create_backend(&manifest.backend_config()).map_err(|e| e.to_string())
}

async fn load_state(backend: &dyn StateBackend) -> Result<StateFile, String> {
    Ok(backend
        .read_state()
        .await
        .map_err(|e| format!("Failed to read state: {}", e))?
        .unwrap_or_default())
}

struct PreparedPlan {
    plan: Plan,
    bindings: BindingMap,
}

/// Resolve data sources, refresh managed resources, resolve references,
/// and diff. Orphaned state entries become delete effects.
async fn prepare_plan(
    provider: &AwxProvider,
    state: &StateFile,
    resources: &[Resource],
) -> Result<PreparedPlan, String> {
    let mut bindings: BindingMap = HashMap::new();

    // Data sources resolve first so later blocks can reference them.
    for resource in resources {
        if !resource.is_data_source() {
            continue;
        }
        let resolved = bindings::resolve_resource(resource, &bindings);
        let looked_up = provider
            .resolve(&resolved)
            .await
            .map_err(|e| e.to_string())?;
        bindings::rebind_applied(&mut bindings, &resolved, &looked_up);
    }

    let current_states = refresh_states(provider, state, resources).await?;

    for resource in resources {
        if resource.is_data_source() {
            continue;
        }
        bindings::bind(&mut bindings, resource, current_states.get(&resource.id));
    }

    let resolved: Vec<Resource> = resources
        .iter()
        .map(|r| bindings::resolve_resource(r, &bindings))
        .collect();

    let mut plan = create_plan(&resolved, &current_states, &get_schemas());
    for effect in orphaned_deletes(state, resources) {
        plan.add(effect);
    }

    Ok(PreparedPlan { plan, bindings })
}

/// Read the current remote state of every managed block. Attributes a
/// read does not echo (a node's parentage, a grant's role name) survive
/// from the recorded state.
async fn refresh_states(
    provider: &AwxProvider,
    state: &StateFile,
    resources: &[Resource],
) -> Result<HashMap<ResourceId, State>, String> {
    let mut current_states = HashMap::new();

    for resource in resources {
        if resource.is_data_source() {
            continue;
        }

        let stored = state.find_resource(&resource.id.resource_type, &resource.id.name);
        let identifier = stored.and_then(|s| s.identifier.as_deref());

        let read = provider
            .read(&resource.id, identifier)
            .await
            .map_err(|e| format!("Failed to read state: {}", e))?;

        let merged = if read.exists {
            let mut attrs: HashMap<String, Value> = stored
                .map(|s| {
                    s.attributes
                        .iter()
                        .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
                        .collect()
                })
                .unwrap_or_default();
            for (key, value) in &read.attributes {
                attrs.insert(key.clone(), value.clone());
            }

            let mut merged = State::existing(resource.id.clone(), attrs);
            if let Some(identifier) = read
                .identifier
                .clone()
                .or_else(|| identifier.map(str::to_string))
            {
                merged = merged.with_identifier(identifier);
            }
            merged
        } else {
            read
        };

        current_states.insert(resource.id.clone(), merged);
    }

    Ok(current_states)
}

/// State entries no longer declared in the manifest get a delete effect.
fn orphaned_deletes(state: &StateFile, resources: &[Resource]) -> Vec<Effect> {
    state
        .resources
        .iter()
        .filter(|stored| {
            !resources
                .iter()
                .any(|r| r.id.resource_type == stored.resource_type && r.id.name == stored.name)
        })
        .map(|stored| {
            Effect::Delete(ResourceId::new(
                stored.resource_type.clone(),
                stored.name.clone(),
            ))
        })
        .collect()
}

/// Record an applied resource: the resolved declaration overlaid with
/// whatever the server reported, plus the tracked identifier.
fn record_applied(state: &mut StateFile, resource: &Resource, new_state: &State, provider: &str) {
    let mut attrs = resource.attributes.clone();
    for (key, value) in &new_state.attributes {
        attrs.insert(key.clone(), value.clone());
    }

    let mut record = ResourceState::new(
        resource.id.resource_type.clone(),
        resource.id.name.clone(),
        provider,
    );
    for (key, value) in &attrs {
        record.attributes.insert(key.clone(), value_to_json(value));
    }
    if let Some(identifier) = &new_state.identifier {
        record = record.with_identifier(identifier.clone());
    }

    state.upsert_resource(record);
}

/// References still unresolved when an effect is about to run fail that
/// effect with a diagnostic instead of reaching the server.
fn report_unresolved(resolved: &Resource, effect: &Effect) -> bool {
    let refs = bindings::unresolved_refs(resolved);
    if refs.is_empty() {
        return false;
    }
    println!(
        "  {} {} - unresolved reference {}",
        "✗".red(),
        format_effect(effect),
        refs.join(", ")
    );
    true
}

fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("{}", "No changes. Remote objects are up-to-date.".green());
        return;
    }

    println!("{}", "Execution Plan:".cyan().bold());
    println!();

    for effect in plan.effects() {
        match effect {
            Effect::Read(r) => {
                println!(
                    "  {} {}.{}",
                    "?".normal(),
                    r.id.resource_type.cyan(),
                    r.id.name
                );
            }
            Effect::Create(r) => {
                println!(
                    "  {} {}.{}",
                    "+".green().bold(),
                    r.id.resource_type.cyan().bold(),
                    r.id.name
                );
                print_attributes(&r.attributes, None);
            }
            Effect::Update { id, from, to } => {
                println!(
                    "  {} {}.{}",
                    "~".yellow().bold(),
                    id.resource_type.cyan().bold(),
                    id.name
                );
                print_attributes(&to.attributes, Some(&from.attributes));
            }
            Effect::Replace { id, from, to } => {
                println!(
                    "  {} {}.{}",
                    "-/+".red().bold(),
                    id.resource_type.cyan().bold(),
                    id.name
                );
                print_attributes(&to.attributes, Some(&from.attributes));
            }
            Effect::Delete(id) => {
                println!(
                    "  {} {}.{}",
                    "-".red().bold(),
                    id.resource_type.cyan().bold(),
                    id.name
                );
            }
        }
    }

    println!();
    let summary = plan.summary();
    println!(
        "Plan: {} to create, {} to update, {} to replace, {} to delete.",
        summary.create.to_string().green(),
        summary.update.to_string().yellow(),
        summary.replace.to_string().red(),
        summary.delete.to_string().red()
    );
}

/// Print create attributes, or just the changed ones when a previous
/// value set is given. `name` sorts first.
fn print_attributes(attributes: &HashMap<String, Value>, previous: Option<&HashMap<String, Value>>) {
    let mut keys: Vec<_> = attributes.keys().filter(|k| !k.starts_with('_')).collect();
    keys.sort_by(|a, b| match (a.as_str(), b.as_str()) {
        ("name", _) => std::cmp::Ordering::Less,
        (_, "name") => std::cmp::Ordering::Greater,
        _ => a.cmp(b),
    });

    for key in keys {
        let value = &attributes[key];
        match previous {
            Some(prev) => {
                let old = prev.get(key);
                if old != Some(value) {
                    let old_str = old
                        .map(format_value)
                        .unwrap_or_else(|| "(none)".to_string());
                    println!(
                        "      {}: {} → {}",
                        key,
                        old_str.red(),
                        format_value(value).green()
                    );
                }
            }
            None => {
                if key == "name" {
                    println!("      {}: {}", key.bold(), format_value(value).white().bold());
                } else {
                    println!("      {}: {}", key, format_value(value).green());
                }
            }
        }
    }
}

fn format_effect(effect: &Effect) -> String {
    match effect {
        Effect::Read(r) => format!("Read {}.{}", r.id.resource_type, r.id.name),
        Effect::Create(r) => format!("Create {}.{}", r.id.resource_type, r.id.name),
        Effect::Update { id, .. } => format!("Update {}.{}", id.resource_type, id.name),
        Effect::Replace { id, .. } => format!("Replace {}.{}", id.resource_type, id.name),
        Effect::Delete(id) => format!("Delete {}.{}", id.resource_type, id.name),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let strs: Vec<_> = items.iter().map(format_value).collect();
            format!("[{}]", strs.join(", "))
        }
        Value::Map(map) => {
            let strs: Vec<_> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            format!("{{{}}}", strs.join(", "))
        }
        Value::Ref(binding, attribute) => format!("${{{}.{}}}", binding, attribute),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => {
            let obj: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            serde_json::Value::Object(obj)
        }
        // References are resolved before anything is recorded; a leftover
        // renders as its placeholder text.
        Value::Ref(binding, attribute) => {
            serde_json::Value::String(format!("${{{}.{}}}", binding, attribute))
        }
    }
}

fn json_to_value(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => Some(Value::Int(n.as_i64().unwrap_or(0))),
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            Some(Value::List(items.iter().filter_map(json_to_value).collect()))
        }
        serde_json::Value::Object(map) => Some(Value::Map(
            map.iter()
                .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
    }
}
