use anyhow::Result;

use push_shell::sdk::{ProcessContext, SdkRegistry};
use push_shell::ShellConfig;

pub async fn run_status(config: ShellConfig) -> Result<()> {
    let process = ProcessContext::new(&config.config_dir);
    let registry = SdkRegistry::discover(&process);

    println!("Config directory: {}", config.config_dir.display());
    println!(
        "   shell.json: {}",
        if config.settings_path().exists() {
            "present"
        } else {
            "absent (defaults)"
        }
    );
    println!("   JS global: window.{}", config.js_global);

    if registry.resolve(&config.sdk_name).is_some() {
        println!("✅ Driver '{}' is built in", config.sdk_name);
    } else {
        println!("❌ Driver '{}' is not part of this build", config.sdk_name);
    }

    #[cfg(feature = "push-sdk")]
    {
        let artifact = config
            .config_dir
            .join(push_shell::sdk::push::CONFIG_ARTIFACT);
        if artifact.exists() {
            println!("   Artifact: {}", artifact.display());
        } else {
            println!("   Artifact missing: {}", artifact.display());
            println!("   Push notifications will be disabled.");
        }
    }

    Ok(())
}
