//! `marina inspect` command

use anyhow::Result;

use crate::cli::InspectArgs;
use marina::core::{FsModeProbe, DESCRIPTOR_FILENAME};
use marina::extension::ExtensionRunner;
use marina::inspect::Depth;
use marina::ops::{HostCapabilities, HostEnvironment, InspectCommand, InspectOptions};
use marina::util::config::load_config;
use marina::util::diagnostic::suggestions;
use marina::util::GlobalContext;

pub fn execute(args: InspectArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let root = ctx.find_project_root().ok_or_else(|| {
        anyhow::anyhow!(
            "could not find {} in {} or any parent directory\n{}",
            DESCRIPTOR_FILENAME,
            ctx.cwd().display(),
            suggestions::NO_DESCRIPTOR
        )
    })?;

    let config = load_config(&ctx.config_path(), &GlobalContext::project_config_path(&root));
    let defaults = config.inspect;

    let depth = match (&args.depth, &defaults.depth) {
        (Some(flag), _) => Depth::parse_lenient(flag),
        (None, Some(setting)) => setting.depth(),
        (None, None) => Depth::default(),
    };

    let options = InspectOptions {
        mode: args.mode,
        depth,
        path: args.path,
        colors: args.colors.or(defaults.colors).unwrap_or(true),
        compact: args.compact.or(defaults.compact).unwrap_or(false),
        show_hidden: args.show_hidden.or(defaults.show_hidden).unwrap_or(true),
        debug: args.debug,
    };
    tracing::debug!("inspect options: {:?}", options);

    let runner = ExtensionRunner::discover(&root)?;
    let capabilities = HostCapabilities::detect(&HostEnvironment::new(&root));

    let command = InspectCommand::new(
        &root,
        options,
        Box::new(FsModeProbe::new(&root)),
        runner,
        capabilities,
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = command.run(&mut out)?;

    if !report.missing.is_empty() {
        eprintln!("{}", suggestions::PATH_NOT_FOUND);
    }

    Ok(())
}
