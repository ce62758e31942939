//! Splitting a compiled config into one entry per target.

use crate::core::compiled::CompiledConfig;
use crate::core::mode::{Mode, Target};
use crate::core::value::Value;
use crate::ops::errors::InspectError;

/// A bundler configuration labelled with its target.
#[derive(Debug, Clone)]
pub struct NamedConfigEntry {
    pub name: Target,
    /// Shares the tree attached to the compiled config
    pub config: Value,
}

/// List the attached bundler trees of `mode`, in the mode's target order.
///
/// Targets without an attached tree are skipped. The compiled config is only
/// read; entries point at the same trees.
pub fn split(config: &CompiledConfig, mode: Mode) -> Result<Vec<NamedConfigEntry>, InspectError> {
    let trees = config
        .bundler()
        .ok_or(InspectError::ConfigNotReady { mode })?;

    let entries: Vec<NamedConfigEntry> = mode
        .targets()
        .iter()
        .filter_map(|target| {
            trees.get(target).map(|tree| NamedConfigEntry {
                name: *target,
                config: tree.clone(),
            })
        })
        .collect();

    if entries.is_empty() {
        return Err(InspectError::ConfigNotReady { mode });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiled::BundlerTrees;
    use crate::core::context::{BuildKind, ExecutionContext};

    fn config_with(mode: Mode, targets: &[Target]) -> CompiledConfig {
        let mut config = CompiledConfig::new(ExecutionContext::new(mode, BuildKind::Prod));
        let mut trees = BundlerTrees::new();
        // Insert in reverse to show the mode's order wins
        for target in targets.iter().rev() {
            trees.insert(*target, Value::object());
        }
        config.attach_bundler(trees);
        config
    }

    #[test]
    fn test_split_orders_by_mode() {
        let config = config_with(Mode::Ssg, &[Target::Client, Target::Server]);
        let entries = split(&config, Mode::Ssg).unwrap();

        let names: Vec<Target> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, vec![Target::Client, Target::Server]);
    }

    #[test]
    fn test_split_shares_trees() {
        let config = config_with(Mode::Spa, &[Target::Client]);
        let entries = split(&config, Mode::Spa).unwrap();

        let attached = &config.bundler().unwrap()[&Target::Client];
        assert_eq!(&entries[0].config, attached);
        assert_eq!(attached.as_object().unwrap().borrow().len(), 0);
    }

    #[test]
    fn test_split_skips_unattached_targets() {
        let config = config_with(Mode::Ssr, &[Target::Client, Target::Server]);
        let entries = split(&config, Mode::Ssr).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_split_without_bundler() {
        let config = CompiledConfig::new(ExecutionContext::new(Mode::Ssg, BuildKind::Prod));
        assert!(matches!(
            split(&config, Mode::Ssg),
            Err(InspectError::ConfigNotReady { mode: Mode::Ssg })
        ));
    }

    #[test]
    fn test_split_without_matching_targets() {
        let config = config_with(Mode::Ssr, &[Target::Webserver]);
        assert!(matches!(
            split(&config, Mode::Spa),
            Err(InspectError::ConfigNotReady { .. })
        ));
    }
}
