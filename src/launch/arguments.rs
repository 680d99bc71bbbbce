// ─── Argument Assembler ───
// Builds the four launch argument groups — memory, JVM, window, game —
// that are space-joined into the final java invocation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::account::Account;
use crate::config::{GameConfig, JavaConfig, WindowConfig};
use crate::error::LaunchResult;
use crate::fetch::{ensure_present, FetchItem, FileFetcher};
use crate::launch::classpath::ClasspathBuilder;
use crate::launch::defaults::{
    DEFAULT_ADVANCED_ARGS, DEFAULT_GC_ARGS, LAUNCHER_NAME, LAUNCHER_VERSION, LEGACY_JVM_TEMPLATE,
    OPTIMIZATION_ADVANCED_ARGS, OPTIMIZATION_GC_ARGS, TWEAK_CLASS_TOKENS, UNIFIED_PASS_AGENT_URL,
    WRAPPER_LAUNCHER_URL, YGGDRASIL_AGENT_URL,
};
use crate::paths;
use crate::platform::{self, OsInfo};
use crate::version::manifest::VersionManifest;
use crate::version::rules::argument_tokens;

/// Literal, non-recursive placeholder substitution.
///
/// Every occurrence of every key is replaced, in table order; tokens
/// without a table entry stay verbatim in the output.
pub fn expand_placeholders(template: &str, table: &[(String, String)]) -> String {
    table.iter().fold(template.to_string(), |expanded, (key, value)| {
        expanded.replace(key.as_str(), value)
    })
}

/// Assembles the full argument list for one launch request.
///
/// One builder per launch: the classpath version cache lives inside a
/// single `build()` call, so concurrent launches never share state
/// beyond the idempotently cached agent/wrapper jars on disk.
pub struct ArgumentsBuilder<'a> {
    window: WindowConfig,
    game: GameConfig,
    java: JavaConfig,
    account: Account,
    fetcher: &'a dyn FileFetcher,
    root: PathBuf,
    os: OsInfo,
}

impl<'a> ArgumentsBuilder<'a> {
    pub fn new(
        window: WindowConfig,
        game: GameConfig,
        java: JavaConfig,
        account: Account,
        fetcher: &'a dyn FileFetcher,
    ) -> Self {
        let root = paths::resolve_root(&game.root);
        Self {
            window,
            game,
            java,
            account,
            fetcher,
            root,
            os: OsInfo::current(),
        }
    }

    /// Assemble the four argument groups. The returned strings are
    /// meant to be passed verbatim, space-joined, to a process
    /// launcher.
    pub async fn build(&self) -> LaunchResult<Vec<String>> {
        let manifest = VersionManifest::load(&self.root, &self.game.version_id)?;
        let parent = match &manifest.inherits_from {
            Some(parent_id) => Some(VersionManifest::load(&self.root, parent_id)?),
            None => None,
        };

        Ok(vec![
            self.memory_group(),
            self.jvm_group(&manifest, parent.as_ref()).await?,
            self.window_group(),
            self.game_group(&manifest, parent.as_ref()),
        ])
    }

    // ── Memory ──────────────────────────────────────────

    fn memory_group(&self) -> String {
        format!(
            "-Xmn{}M -Xmx{}M",
            self.java.min_memory_mb, self.java.max_memory_mb
        )
    }

    // ── JVM ─────────────────────────────────────────────

    async fn jvm_group(
        &self,
        manifest: &VersionManifest,
        parent: Option<&VersionManifest>,
    ) -> LaunchResult<String> {
        let mut args: Vec<String> = Vec::new();

        args.extend(self.agent_args().await?);

        if manifest.is_new_format() {
            args.push(format!(
                "-Dminecraft.client.jar=\"{}\"",
                paths::path_str(&manifest.client_jar_path(&self.root))
            ));
        }

        if platform::is_windows_10_or_newer() {
            args.push("-Dos.name=\"Windows 10\"".into());
            args.push("-Dos.version=10.0".into());
        }

        args.push(self.tuning_args());

        let version_dir = self.root.join("versions").join(&self.game.version_id);
        let mut natives_dir = version_dir.join("natives");
        if !natives_dir.exists() {
            if let Some(found) = paths::find_natives_dir(&version_dir) {
                debug!("Using fallback natives directory: {:?}", found);
                natives_dir = found;
            }
        }

        let classpath = self.build_classpath(manifest, parent);

        let table: Vec<(String, String)> = vec![
            (
                "${natives_directory}".into(),
                format!("\"{}\"", paths::path_str(&natives_dir)),
            ),
            ("${launcher_name}".into(), LAUNCHER_NAME.into()),
            ("${launcher_version}".into(), LAUNCHER_VERSION.into()),
            ("${classpath}".into(), format!("\"{classpath}\"")),
            ("${version_name}".into(), manifest.id.clone()),
            (
                "${library_directory}".into(),
                paths::path_str(&self.root.join("libraries")),
            ),
            (
                "${classpath_separator}".into(),
                platform::classpath_separator().into(),
            ),
        ];

        let template = self.jvm_template(manifest, parent);
        args.push(expand_placeholders(&template, &table));

        args.push(self.wrapper_args().await?);
        args.push(manifest.main_class.clone());

        Ok(args.join(" "))
    }

    /// Authentication-agent flags. The two third-party account kinds
    /// need a local agent jar, fetched into the jar cache when the
    /// configured path is missing.
    async fn agent_args(&self) -> LaunchResult<Vec<String>> {
        match &self.account {
            Account::UnifiedPass {
                server_id,
                agent_jar,
                ..
            } => {
                let jar = self
                    .ensure_agent(agent_jar.as_deref(), "nide8auth.jar", UNIFIED_PASS_AGENT_URL)
                    .await?;
                Ok(vec![format!(
                    "-javaagent:\"{}\"={}",
                    paths::path_str(&jar),
                    server_id
                )])
            }
            Account::Yggdrasil {
                server_url,
                agent_jar,
                ..
            } => {
                let jar = self
                    .ensure_agent(
                        agent_jar.as_deref(),
                        "authlib-injector.jar",
                        YGGDRASIL_AGENT_URL,
                    )
                    .await?;
                Ok(vec![format!(
                    "-javaagent:\"{}\"={}",
                    paths::path_str(&jar),
                    server_url
                )])
            }
            Account::Microsoft { .. } | Account::Offline { .. } => Ok(Vec::new()),
        }
    }

    async fn ensure_agent(
        &self,
        configured: Option<&Path>,
        file_name: &str,
        url: &str,
    ) -> LaunchResult<PathBuf> {
        if let Some(path) = configured {
            if path.exists() {
                return Ok(paths::resolve_root(path));
            }
        }

        let jar_dir = self.data_dir().join("jar");
        paths::ensure_dir(&jar_dir).await?;
        let jar = jar_dir.join(file_name);
        ensure_present(self.fetcher, FetchItem::new(url, &jar)).await?;
        Ok(jar)
    }

    /// Default tuning flag sets, plus the optimization sets unless the
    /// caller disabled them.
    fn tuning_args(&self) -> String {
        let mut flags: Vec<&str> = Vec::new();
        flags.extend(DEFAULT_GC_ARGS);
        flags.extend(DEFAULT_ADVANCED_ARGS);
        if !self.java.disable_gc_tuning {
            flags.extend(OPTIMIZATION_GC_ARGS);
        }
        if !self.java.disable_advanced_tuning {
            flags.extend(OPTIMIZATION_ADVANCED_ARGS);
        }
        flags.join(" ")
    }

    /// JVM argument template: rule-filtered tokens from the parent
    /// manifest, then the version's own, whitespace collapsed per
    /// token. Old-format manifests use the built-in legacy template.
    fn jvm_template(&self, manifest: &VersionManifest, parent: Option<&VersionManifest>) -> String {
        if !manifest.is_new_format() {
            return LEGACY_JVM_TEMPLATE.join(" ");
        }

        let mut tokens: Vec<String> = Vec::new();
        if let Some(parent) = parent {
            tokens.extend(self.manifest_jvm_tokens(parent));
        }
        tokens.extend(self.manifest_jvm_tokens(manifest));

        tokens
            .iter()
            .map(|token| token.replace(' ', ""))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn manifest_jvm_tokens(&self, manifest: &VersionManifest) -> Vec<String> {
        manifest
            .arguments
            .as_ref()
            .map(|arguments| {
                arguments
                    .jvm
                    .iter()
                    .flat_map(|element| argument_tokens(element, &self.os))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve the deduplicated classpath: parent libraries first, then
    /// the version's own, then the client jar.
    fn build_classpath(
        &self,
        manifest: &VersionManifest,
        parent: Option<&VersionManifest>,
    ) -> String {
        let libraries_root = self.root.join("libraries");
        let mut builder = ClasspathBuilder::new(&libraries_root, &self.os);
        if let Some(parent) = parent {
            builder.add_libraries(&parent.libraries);
        }
        builder.add_libraries(&manifest.libraries);
        builder.build(&manifest.client_jar_path(&self.root))
    }

    /// Wrapper-launcher invocation, fetched into the jar cache on first
    /// use.
    async fn wrapper_args(&self) -> LaunchResult<String> {
        let data_dir = self.data_dir();
        let jar_dir = data_dir.join("jar");
        let temp_dir = data_dir.join("temp");
        paths::ensure_dir(&jar_dir).await?;
        paths::ensure_dir(&temp_dir).await?;

        let wrapper = jar_dir.join("launch_wrapper.jar");
        ensure_present(self.fetcher, FetchItem::new(WRAPPER_LAUNCHER_URL, &wrapper)).await?;

        Ok(format!(
            "-Doolloo.jlw.tmpdir=\"{}\" -jar \"{}\"",
            paths::path_str(&temp_dir),
            paths::path_str(&wrapper)
        ))
    }

    fn data_dir(&self) -> PathBuf {
        self.game
            .data_dir
            .clone()
            .unwrap_or_else(paths::default_data_dir)
    }

    // ── Window ──────────────────────────────────────────

    fn window_group(&self) -> String {
        let mut args = vec![
            format!("--width {}", self.window.width),
            format!("--height {}", self.window.height),
        ];
        if self.window.fullscreen {
            args.push("--fullscreen".into());
        }
        args.join(" ")
    }

    // ── Game ────────────────────────────────────────────

    fn game_group(&self, manifest: &VersionManifest, parent: Option<&VersionManifest>) -> String {
        let game_directory = if self.game.version_isolation {
            self.root.join("versions").join(&self.game.version_id)
        } else {
            self.root.clone()
        };

        let release_type = manifest.release_type.as_deref().unwrap_or("release");
        // Inheriting manifests usually carry no asset identifier of
        // their own; the parent's applies.
        let asset_index = match (&manifest.assets, &manifest.asset_index, parent) {
            (None, None, Some(parent)) => parent.asset_index_id(),
            _ => manifest.asset_index_id(),
        };
        let table: Vec<(String, String)> = vec![
            (
                "${auth_player_name}".into(),
                self.account.username().to_string(),
            ),
            (
                "${version_name}".into(),
                format!("\"{}\"", self.game.version_id),
            ),
            (
                "${assets_root}".into(),
                format!("\"{}\"", paths::path_str(&self.root.join("assets"))),
            ),
            ("${assets_index_name}".into(), asset_index.to_string()),
            ("${auth_uuid}".into(), self.account.uuid().replace('-', "")),
            (
                "${auth_access_token}".into(),
                self.account.access_token().to_string(),
            ),
            // Resolved by the process launcher, one stage later.
            ("${clientid}".into(), "${clientid}".into()),
            ("${auth_xuid}".into(), "${auth_xuid}".into()),
            ("${user_type}".into(), self.account.user_type().to_string()),
            (
                "${version_type}".into(),
                format!("\"{}/{}\"", LAUNCHER_NAME, title_case(release_type)),
            ),
            ("${user_properties}".into(), "{}".into()),
            (
                "${game_directory}".into(),
                format!("\"{}\"", paths::path_str(&game_directory)),
            ),
        ];

        let mut game_arguments = self.manifest_game_arguments(manifest);
        if let Some(parent) = parent {
            game_arguments = format!("{} {}", game_arguments, self.manifest_game_arguments(parent));
        }

        let game_arguments = relocate_tweak_class(&game_arguments);
        expand_placeholders(&game_arguments, &table)
    }

    /// One manifest's game argument string: rule-filtered structured
    /// tokens for new-format manifests, the flat legacy string
    /// otherwise.
    fn manifest_game_arguments(&self, manifest: &VersionManifest) -> String {
        match &manifest.arguments {
            Some(arguments) => arguments
                .game
                .iter()
                .flat_map(|element| argument_tokens(element, &self.os))
                .collect::<Vec<_>>()
                .join(" "),
            None => manifest.minecraft_arguments.clone().unwrap_or_default(),
        }
    }
}

/// Move a known legacy tweak-class flag to the end of the argument
/// string so that tweaker initializes after every other flag.
fn relocate_tweak_class(arguments: &str) -> String {
    for token in TWEAK_CLASS_TOKENS {
        if arguments.contains(token) {
            let stripped = arguments.replace(token, "");
            return format!("{} {}", stripped.trim(), token).trim().to_string();
        }
    }
    arguments.to_string()
}

fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubFetcher;

    #[async_trait]
    impl FileFetcher for StubFetcher {
        async fn fetch_files(&self, items: &[FetchItem]) -> LaunchResult<()> {
            for item in items {
                if let Some(parent) = item.dest.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| LaunchError::Io {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
                std::fs::write(&item.dest, b"stub").map_err(|e| LaunchError::Io {
                    path: item.dest.clone(),
                    source: e,
                })?;
            }
            Ok(())
        }
    }

    fn write_manifest(root: &Path, id: &str, body: &serde_json::Value) {
        let path = VersionManifest::manifest_path(root, id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string(body).unwrap()).unwrap();
    }

    fn builder_for<'a>(
        root: &Path,
        version_id: &str,
        fetcher: &'a dyn FileFetcher,
    ) -> ArgumentsBuilder<'a> {
        let mut game = GameConfig::new(root, version_id);
        game.data_dir = Some(root.join("launcher-data"));
        ArgumentsBuilder::new(
            WindowConfig::default(),
            game,
            JavaConfig::default(),
            Account::offline("Alex"),
            fetcher,
        )
    }

    // ── Placeholder expansion ──

    #[test]
    fn expand_replaces_every_occurrence_in_table_order() {
        let table = vec![
            ("${name}".to_string(), "Alex".to_string()),
            ("${dir}".to_string(), "/game".to_string()),
        ];
        let expanded =
            expand_placeholders("--user ${name} --dir ${dir} --again ${name}", &table);
        assert_eq!(expanded, "--user Alex --dir /game --again Alex");
    }

    #[test]
    fn expand_leaves_unresolved_tokens_verbatim() {
        let table = vec![("${known}".to_string(), "value".to_string())];
        let expanded = expand_placeholders("${known} ${clientid} ${auth_xuid}", &table);
        assert_eq!(expanded, "value ${clientid} ${auth_xuid}");
    }

    #[test]
    fn expand_is_idempotent_for_stable_tables() {
        let table = vec![
            ("${width}".to_string(), "854".to_string()),
            ("${height}".to_string(), "480".to_string()),
        ];
        let template = "--width ${width} --height ${height} --other ${missing}";
        let once = expand_placeholders(template, &table);
        let twice = expand_placeholders(&once, &table);
        assert_eq!(once, twice);
    }

    // ── Tweak-class relocation ──

    #[test]
    fn tweak_class_moves_to_the_end() {
        let arguments =
            "--tweakClass optifine.OptiFineForgeTweaker --username ${auth_player_name}";
        let relocated = relocate_tweak_class(arguments);
        assert_eq!(
            relocated,
            "--username ${auth_player_name} --tweakClass optifine.OptiFineForgeTweaker"
        );
    }

    #[test]
    fn tweak_class_match_is_case_sensitive() {
        let arguments = "--tweakclass optifine.optifinetweaker --username Alex";
        assert_eq!(relocate_tweak_class(arguments), arguments);
    }

    // ── Group construction ──

    #[test]
    fn memory_group_formats_both_heap_flags() {
        let temp = std::env::temp_dir().join(format!("args-test-memory-{}", std::process::id()));
        let fetcher = StubFetcher;
        let mut builder = builder_for(&temp, "1.20.1", &fetcher);
        builder.java = JavaConfig {
            min_memory_mb: 512,
            max_memory_mb: 2048,
            ..JavaConfig::default()
        };
        assert_eq!(builder.memory_group(), "-Xmn512M -Xmx2048M");
    }

    #[test]
    fn window_group_appends_fullscreen_flag() {
        let temp = std::env::temp_dir().join(format!("args-test-window-{}", std::process::id()));
        let fetcher = StubFetcher;
        let mut builder = builder_for(&temp, "1.20.1", &fetcher);
        builder.window = WindowConfig {
            width: 854,
            height: 480,
            fullscreen: true,
        };
        assert_eq!(builder.window_group(), "--width 854 --height 480 --fullscreen");

        builder.window.fullscreen = false;
        assert_eq!(builder.window_group(), "--width 854 --height 480");
    }

    // ── End-to-end build ──

    fn seed_inheriting_versions(root: &Path) {
        write_manifest(
            root,
            "1.20.1",
            &json!({
                "id": "1.20.1",
                "type": "release",
                "mainClass": "net.minecraft.client.main.Main",
                "assetIndex": {"id": "17"},
                "libraries": [
                    {"name": "com.google.guava:guava:32.1"},
                    {"name": "org.foo:bar:1.0"}
                ],
                "arguments": {
                    "game": ["--username", "${auth_player_name}", "--assetIndex", "${assets_index_name}"],
                    "jvm": ["-Djava.library.path=${natives_directory}", "-cp", "${classpath}"]
                }
            }),
        );
        write_manifest(
            root,
            "1.20.1-loader",
            &json!({
                "id": "1.20.1-loader",
                "inheritsFrom": "1.20.1",
                "type": "release",
                "mainClass": "net.loader.Main",
                "libraries": [
                    {"name": "org.foo:bar:2.0"},
                    {"name": "optifine:OptiFine:HD_U_I5"}
                ],
                "arguments": {
                    "game": ["--launchTarget", "client"],
                    "jvm": ["-DloaderVersion=${version_name}"]
                }
            }),
        );
    }

    #[tokio::test]
    async fn build_produces_four_groups_for_an_inheriting_version() {
        let temp = std::env::temp_dir().join(format!("args-test-build-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        seed_inheriting_versions(&temp);

        let fetcher = StubFetcher;
        let builder = builder_for(&temp, "1.20.1-loader", &fetcher);
        let groups = builder.build().await.unwrap();
        assert_eq!(groups.len(), 4);

        let [memory, jvm, window, game] = [&groups[0], &groups[1], &groups[2], &groups[3]];

        assert_eq!(memory, "-Xmn512M -Xmx2048M");
        assert_eq!(window, "--width 854 --height 480");

        // Classpath: parent's bar-1.0 superseded by the child's 2.0,
        // OptiFine after ordinary libraries, client jar last.
        assert!(jvm.contains("bar-2.0.jar"));
        assert!(!jvm.contains("bar-1.0.jar"));
        let optifine_at = jvm.find("OptiFine-HD_U_I5.jar").unwrap();
        assert!(jvm.find("guava-32.1.jar").unwrap() < optifine_at);
        // Inherited versions run from the parent's client jar.
        assert!(jvm.contains("1.20.1.jar"));

        // Parent JVM template tokens come before the child's.
        assert!(jvm.find("-Djava.library.path").unwrap() < jvm.find("-DloaderVersion").unwrap());
        assert!(jvm.contains("-DloaderVersion=1.20.1-loader"));

        // Tuning sets and the wrapper invocation are merged in.
        assert!(jvm.contains("-XX:+UseG1GC"));
        assert!(jvm.contains("-XX:MaxGCPauseMillis=50"));
        assert!(jvm.contains("launch_wrapper.jar"));
        assert!(jvm.ends_with("net.loader.Main"));

        // Game group: child args first, then the parent's, expanded.
        assert!(game.contains("--launchTarget client"));
        assert!(game.contains("--username Alex"));
        assert!(game.contains("--assetIndex 17"));
        assert!(game.find("--launchTarget").unwrap() < game.find("--username").unwrap());

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn build_disabling_tuning_sets_drops_optimization_flags() {
        let temp = std::env::temp_dir().join(format!("args-test-tuning-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        seed_inheriting_versions(&temp);

        let fetcher = StubFetcher;
        let mut builder = builder_for(&temp, "1.20.1", &fetcher);
        builder.java.disable_gc_tuning = true;
        builder.java.disable_advanced_tuning = true;

        let groups = builder.build().await.unwrap();
        let jvm = &groups[1];
        assert!(jvm.contains("-XX:+UseG1GC"));
        assert!(jvm.contains("-Dlog4j2.formatMsgNoLookups=true"));
        assert!(!jvm.contains("-XX:MaxGCPauseMillis=50"));
        assert!(!jvm.contains("-XX:+UnlockExperimentalVMOptions"));

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn build_legacy_manifest_uses_flat_arguments_and_template() {
        let temp = std::env::temp_dir().join(format!("args-test-legacy-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        write_manifest(
            &temp,
            "1.8.9",
            &json!({
                "id": "1.8.9",
                "type": "release",
                "mainClass": "net.minecraft.client.main.Main",
                "assets": "1.8",
                "libraries": [{"name": "org.foo:bar:1.0"}],
                "minecraftArguments":
                    "--username ${auth_player_name} --tweakClass optifine.OptiFineTweaker --gameDir ${game_directory}"
            }),
        );

        let fetcher = StubFetcher;
        let builder = builder_for(&temp, "1.8.9", &fetcher);
        let groups = builder.build().await.unwrap();
        let [jvm, game] = [&groups[1], &groups[3]];

        // Old format: no client-jar flag, built-in JVM template.
        assert!(!jvm.contains("-Dminecraft.client.jar"));
        assert!(jvm.contains("-Djava.library.path="));
        assert!(jvm.contains("-cp \""));

        // The tweak class ends up after every other game flag.
        assert!(game.contains("--username Alex"));
        assert!(game.trim_end().ends_with("--tweakClass optifine.OptiFineTweaker"));

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn build_missing_manifest_is_fatal() {
        let temp = std::env::temp_dir().join(format!("args-test-fatal-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);

        let fetcher = StubFetcher;
        let builder = builder_for(&temp, "absent", &fetcher);
        let err = builder.build().await.unwrap_err();
        assert!(matches!(err, LaunchError::ManifestRead { .. }));
    }

    #[tokio::test]
    async fn unified_pass_account_injects_agent_flag() {
        let temp = std::env::temp_dir().join(format!("args-test-agent-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        seed_inheriting_versions(&temp);

        let fetcher = StubFetcher;
        let mut builder = builder_for(&temp, "1.20.1", &fetcher);
        builder.account = Account::UnifiedPass {
            username: "Alex".into(),
            uuid: "a0b1".into(),
            access_token: "token".into(),
            server_id: "server-42".into(),
            agent_jar: None,
        };

        let groups = builder.build().await.unwrap();
        let jvm = &groups[1];
        assert!(jvm.contains("-javaagent:\""));
        assert!(jvm.contains("nide8auth.jar\"=server-42"));
        // The stub fetcher materialized the agent into the data dir.
        assert!(temp.join("launcher-data/jar/nide8auth.jar").exists());

        let _ = std::fs::remove_dir_all(&temp);
    }
}
