//! Bundler configuration generation.
//!
//! Turns the compiled settings of each target into the tree the bundler
//! would be started with. Trees are plain [`Value`]s so extensions can edit
//! them and the printer can show them; plugin instances are class-named
//! objects.

use std::path::Path;

use crate::core::compiled::{BuildSettings, BundlerTrees, CompiledConfig};
use crate::core::descriptor::{RuleSpec, SsrSection};
use crate::core::mode::{Mode, Target};
use crate::core::value::{ObjectRef, Value};

const RESOLVE_EXTENSIONS: &[&str] = &[".mjs", ".js", ".ts", ".vue", ".json", ".wasm"];

/// Targets a mode bundles, in output order.
///
/// The webserver bundle is only produced in ssr mode when enabled in `[ssr]`.
pub fn build_targets(mode: Mode, ssr: &SsrSection) -> Vec<Target> {
    mode.targets()
        .iter()
        .copied()
        .filter(|target| *target != Target::Webserver || ssr.webserver)
        .collect()
}

/// Generate a tree for every target with compiled settings.
pub fn generate(config: &CompiledConfig, root: &Path) -> BundlerTrees {
    config
        .targets
        .iter()
        .map(|(target, settings)| (*target, generate_target(config, *target, settings, root)))
        .collect()
}

/// Generate the tree for one target.
pub fn generate_target(
    config: &CompiledConfig,
    target: Target,
    settings: &BuildSettings,
    root: &Path,
) -> Value {
    let ctx = config.ctx();
    let tree = ObjectRef::new()
        .with("name", target.as_str())
        .with("mode", if ctx.prod() { "production" } else { "development" })
        .with("target", if target.is_node() { "node" } else { "web" })
        .with("devtool", devtool(target, settings, ctx.dev()))
        .with("context", root.display().to_string())
        .with("entry", entry(target))
        .with("output", output(target, settings, root, ctx.prod()))
        .with("resolve", resolve(config, root))
        .with("module", ObjectRef::new().with("rules", rules(config, target, settings)))
        .with("optimization", optimization(target, settings, ctx.prod()));

    if target.is_node() {
        tree.set(
            "externalsPresets",
            ObjectRef::new().with("node", true),
        );
    }

    let root_value = Value::Object(tree.clone());
    tree.set("plugins", plugins(config, target, settings, &root_value));
    tree.set("performance", performance(target, ctx.prod()));

    root_value
}

fn devtool(target: Target, settings: &BuildSettings, dev: bool) -> Value {
    if !settings.source_map {
        return Value::Bool(false);
    }
    if dev && !target.is_node() {
        Value::from("eval-cheap-module-source-map")
    } else {
        Value::from("source-map")
    }
}

fn entry(target: Target) -> ObjectRef {
    let app = match target {
        Target::Client => "./.marina/client-entry.js",
        Target::Server => "./.marina/server-entry.js",
        Target::Webserver => "./src-ssr/server.js",
    };
    ObjectRef::new().with("app", app)
}

fn output(target: Target, settings: &BuildSettings, root: &Path, prod: bool) -> ObjectRef {
    let dir = match target {
        Target::Client => "www",
        Target::Server => "server",
        Target::Webserver => "",
    };
    let mut path = root.join(&settings.dist_dir);
    if !dir.is_empty() {
        path.push(dir);
    }

    let output = ObjectRef::new()
        .with("path", path.display().to_string())
        .with("publicPath", settings.public_path.as_str());

    if target.is_node() {
        output
            .with("filename", "[name].js")
            .with("library", ObjectRef::new().with("type", "commonjs2"))
    } else if prod {
        output
            .with("filename", "js/[name].[contenthash:8].js")
            .with("chunkFilename", "js/[name].[contenthash:8].js")
    } else {
        output
            .with("filename", "js/[name].js")
            .with("chunkFilename", "js/[name].js")
    }
}

fn resolve(config: &CompiledConfig, root: &Path) -> ObjectRef {
    let alias = ObjectRef::new()
        .with("src", root.join("src").display().to_string())
        .with("app", root.display().to_string());
    for (name, target) in &config.aliases {
        alias.set(name.as_str(), root.join(target).display().to_string());
    }

    ObjectRef::new()
        .with(
            "extensions",
            Value::array(RESOLVE_EXTENSIONS.iter().map(|ext| Value::from(*ext))),
        )
        .with("alias", alias)
}

fn rules(config: &CompiledConfig, target: Target, settings: &BuildSettings) -> Value {
    let mut rules = Vec::new();

    if target != Target::Webserver {
        rules.push(vue_rule(config, target));
    }

    rules.push(Value::Object(
        ObjectRef::new()
            .with("test", Value::regex(r"\.m?jsx?$"))
            .with("loader", "babel-loader")
            .with("exclude", Value::regex(transpile_exclude(&settings.transpile_dependencies))),
    ));
    rules.push(Value::Object(
        ObjectRef::new()
            .with("test", Value::regex(r"\.ts$"))
            .with("loader", "ts-loader")
            .with(
                "options",
                ObjectRef::new()
                    .with("transpileOnly", true)
                    .with("appendTsSuffixTo", Value::array([Value::regex(r"\.vue$")])),
            ),
    ));

    if target == Target::Client {
        let style_loader = if settings.extract_css {
            "mini-css-extract-plugin/loader"
        } else {
            "vue-style-loader"
        };
        rules.push(Value::Object(
            ObjectRef::new()
                .with("test", Value::regex(r"\.css$"))
                .with(
                    "use",
                    Value::array([Value::from(style_loader), Value::from("css-loader")]),
                ),
        ));
    } else if target == Target::Server {
        rules.push(Value::Object(
            ObjectRef::new()
                .with("test", Value::regex(r"\.css$"))
                .with("loader", "null-loader"),
        ));
    }

    rules.extend(
        config
            .rules
            .iter()
            .filter(|rule| rule.applies_to(target))
            .map(custom_rule),
    );

    Value::array(rules)
}

fn vue_rule(config: &CompiledConfig, target: Target) -> Value {
    let options = ObjectRef::new();

    if target == Target::Server && !config.directives.is_empty() {
        let transforms = ObjectRef::new();
        for name in &config.directives {
            transforms.set(name.as_str(), Value::function(name.as_str()));
        }
        options.set(
            "compilerOptions",
            ObjectRef::new().with("directiveTransforms", transforms),
        );
    }

    Value::Object(
        ObjectRef::new()
            .with("test", Value::regex(r"\.vue$"))
            .with("loader", "vue-loader")
            .with("options", options),
    )
}

fn custom_rule(rule: &RuleSpec) -> Value {
    let obj = ObjectRef::new()
        .with("test", Value::regex(rule.test.as_str()))
        .with("loader", rule.loader.as_str());
    if let Some(exclude) = &rule.exclude {
        obj.set("exclude", Value::regex(exclude.as_str()));
    }
    Value::Object(obj)
}

/// Exclude pattern for transpiled sources: every dependency except the listed ones.
fn transpile_exclude(deps: &[String]) -> String {
    if deps.is_empty() {
        return r"node_modules".to_string();
    }
    let alternatives: Vec<String> = deps.iter().map(|dep| regex::escape(dep)).collect();
    format!(r"node_modules[\\/](?!({})[\\/])", alternatives.join("|"))
}

fn optimization(target: Target, settings: &BuildSettings, prod: bool) -> ObjectRef {
    let optimization = ObjectRef::new()
        .with("minimize", settings.minify)
        .with("nodeEnv", if prod { "production" } else { "development" });

    if target == Target::Client {
        optimization.with(
            "splitChunks",
            ObjectRef::new().with("chunks", "all").with(
                "cacheGroups",
                ObjectRef::new().with(
                    "vendors",
                    ObjectRef::new()
                        .with("name", "vendor")
                        .with("test", Value::regex(r"[\\/]node_modules[\\/]"))
                        .with("priority", -10i64),
                ),
            ),
        )
    } else {
        optimization.with("splitChunks", false)
    }
}

fn plugins(
    config: &CompiledConfig,
    target: Target,
    settings: &BuildSettings,
    root: &Value,
) -> Value {
    let mut plugins = vec![define_plugin(config, target, settings)];

    if target == Target::Client && settings.extract_css {
        plugins.push(Value::Object(
            ObjectRef::with_class("MiniCssExtractPlugin")
                .with("filename", "css/[name].[contenthash:8].css"),
        ));
    }

    if target == Target::Server {
        plugins.push(Value::Object(
            ObjectRef::with_class("SsrManifestPlugin").with("filename", "ssr-manifest.json"),
        ));
    }

    if target == Target::Client && config.mode() == Mode::Ssg {
        let ssg = &config.ssg;
        plugins.push(Value::Object(
            ObjectRef::with_class("SsgRoutesPlugin")
                .with(
                    "routes",
                    Value::array(ssg.routes.iter().map(|r| Value::from(r.as_str()))),
                )
                .with("concurrency", ssg.concurrency)
                .with("fallback", ssg.fallback.as_str())
                .with("crawler", ssg.crawler),
        ));
    }

    let progress = ObjectRef::with_class("BuildProgressPlugin").with("name", target.as_str());
    progress.set_hidden("apply", Value::function("apply"));
    progress.set("config", root.clone());
    plugins.push(Value::Object(progress));

    Value::array(plugins)
}

fn define_plugin(config: &CompiledConfig, target: Target, settings: &BuildSettings) -> Value {
    let ctx = config.ctx();
    let env = ObjectRef::new()
        .with("MODE", quoted(config.mode().as_str()))
        .with("PROD", ctx.prod())
        .with("DEV", ctx.dev())
        .with("CLIENT", target == Target::Client)
        .with("SERVER", target.is_node());
    for (key, value) in &settings.env {
        env.set(key.as_str(), quoted(value));
    }

    Value::Object(
        ObjectRef::with_class("DefinePlugin")
            .with("definitions", ObjectRef::new().with("process.env", env)),
    )
}

/// Source text of a string literal, as the define plugin substitutes it.
fn quoted(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn performance(target: Target, prod: bool) -> ObjectRef {
    let hints: Value = if prod && target == Target::Client {
        "warning".into()
    } else {
        false.into()
    };
    ObjectRef::new()
        .with("hints", hints)
        .with("maxEntrypointSize", 512_000usize)
        .with("maxAssetSize", 512_000usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{BuildKind, ExecutionContext};
    use crate::inspect::path::select;

    fn compiled(mode: Mode, ssr: SsrSection) -> CompiledConfig {
        let ctx = ExecutionContext::new(mode, BuildKind::Prod);
        let mut config = CompiledConfig::new(ctx.clone());
        for target in build_targets(mode, &ssr) {
            config.targets.insert(target, BuildSettings::defaults(&ctx));
        }
        config.ssr = ssr;
        config
    }

    #[test]
    fn test_build_targets() {
        let off = SsrSection::default();
        let on = SsrSection {
            webserver: true,
            ..SsrSection::default()
        };

        assert_eq!(build_targets(Mode::Spa, &on), vec![Target::Client]);
        assert_eq!(build_targets(Mode::Ssg, &on), vec![Target::Client, Target::Server]);
        assert_eq!(build_targets(Mode::Ssr, &off), vec![Target::Client, Target::Server]);
        assert_eq!(
            build_targets(Mode::Ssr, &on),
            vec![Target::Client, Target::Server, Target::Webserver]
        );
    }

    #[test]
    fn test_generate_follows_target_order() {
        let config = compiled(Mode::Ssg, SsrSection::default());
        let trees = generate(&config, Path::new("/app"));

        assert_eq!(trees.keys().copied().collect::<Vec<_>>(), vec![Target::Client, Target::Server]);
        assert_eq!(select(&trees[&Target::Client], "target"), Some("web".into()));
        assert_eq!(select(&trees[&Target::Server], "target"), Some("node".into()));
        assert_eq!(select(&trees[&Target::Server], "mode"), Some("production".into()));
    }

    #[test]
    fn test_progress_plugin_points_at_root() {
        let config = compiled(Mode::Spa, SsrSection::default());
        let trees = generate(&config, Path::new("/app"));
        let client = &trees[&Target::Client];

        let plugins = select(client, "plugins").unwrap();
        let last = plugins.as_array().unwrap().len() - 1;
        let progress = plugins.as_array().unwrap().get(last).unwrap();

        assert_eq!(progress.as_object().unwrap().borrow().class(), Some("BuildProgressPlugin"));
        assert_eq!(select(&progress, "config"), Some(client.clone()));
        assert_eq!(select(&progress, "apply"), Some(Value::function("apply")));
    }

    #[test]
    fn test_plugins_per_target() {
        let config = compiled(Mode::Ssg, SsrSection::default());
        let trees = generate(&config, Path::new("/app"));

        let classes = |target: Target| -> Vec<String> {
            let plugins = select(&trees[&target], "plugins").unwrap();
            let items = plugins.as_array().unwrap().borrow().clone();
            items
                .iter()
                .filter_map(|p| p.as_object().and_then(|o| o.borrow().class().map(String::from)))
                .collect()
        };

        assert_eq!(
            classes(Target::Client),
            vec!["DefinePlugin", "MiniCssExtractPlugin", "SsgRoutesPlugin", "BuildProgressPlugin"]
        );
        assert_eq!(
            classes(Target::Server),
            vec!["DefinePlugin", "SsrManifestPlugin", "BuildProgressPlugin"]
        );
    }

    #[test]
    fn test_define_plugin_env() {
        let mut config = compiled(Mode::Ssg, SsrSection::default());
        config
            .targets
            .get_mut(&Target::Client)
            .unwrap()
            .env
            .insert("API".to_string(), "https://api".to_string());
        let trees = generate(&config, Path::new("/app"));

        let env = select(&trees[&Target::Client], "plugins.0.definitions").unwrap();
        let env = env.as_object().unwrap().get("process.env").unwrap();
        assert_eq!(select(&env, "MODE"), Some("\"ssg\"".into()));
        assert_eq!(select(&env, "CLIENT"), Some(true.into()));
        assert_eq!(select(&env, "SERVER"), Some(false.into()));
        assert_eq!(select(&env, "API"), Some("\"https://api\"".into()));
    }

    #[test]
    fn test_server_directive_transforms() {
        let mut config = compiled(Mode::Ssr, SsrSection::default());
        config.directives = vec!["tooltip".to_string()];
        let trees = generate(&config, Path::new("/app"));

        assert_eq!(
            select(
                &trees[&Target::Server],
                "module.rules.0.options.compilerOptions.directiveTransforms.tooltip"
            ),
            Some(Value::function("tooltip"))
        );
        assert_eq!(
            select(&trees[&Target::Client], "module.rules.0.options.compilerOptions"),
            None
        );
    }

    #[test]
    fn test_custom_rules_respect_targets() {
        let mut config = compiled(Mode::Ssg, SsrSection::default());
        config.rules.push(RuleSpec {
            test: r"\.md$".to_string(),
            loader: "markdown-loader".to_string(),
            exclude: None,
            targets: Some(vec!["client".to_string()]),
        });
        let trees = generate(&config, Path::new("/app"));

        let loaders = |target: Target| -> Vec<Value> {
            let rules = select(&trees[&target], "module.rules").unwrap();
            let items = rules.as_array().unwrap().borrow().clone();
            items.iter().filter_map(|r| select(r, "loader")).collect()
        };

        assert!(loaders(Target::Client).contains(&"markdown-loader".into()));
        assert!(!loaders(Target::Server).contains(&"markdown-loader".into()));
    }

    #[test]
    fn test_transpile_exclude() {
        assert_eq!(transpile_exclude(&[]), "node_modules");
        assert_eq!(
            transpile_exclude(&["a.b".to_string(), "c".to_string()]),
            r"node_modules[\\/](?!(a\.b|c)[\\/])"
        );
    }
}
