// ─── Default Flag Sets ───
// Tuning flag sets merged into every JVM argument group, the built-in
// JVM template for pre-structured manifests, and the fixed remote
// locations of the fetch-on-first-use artifacts.

/// GC flags every launch gets.
pub const DEFAULT_GC_ARGS: &[&str] = &[
    "-XX:+UseG1GC",
    "-XX:-UseAdaptiveSizePolicy",
    "-XX:-OmitStackTraceInFastThrow",
];

/// Stability flags every launch gets.
pub const DEFAULT_ADVANCED_ARGS: &[&str] = &[
    "-Dfml.ignoreInvalidMinecraftCertificates=true",
    "-Dfml.ignorePatchDiscrepancies=true",
    "-Djava.rmi.server.useCodebaseOnly=true",
    "-Dcom.sun.jndi.rmi.object.trustURLCodebase=false",
    "-Dcom.sun.jndi.cosnaming.object.trustURLCodebase=false",
    "-Dlog4j2.formatMsgNoLookups=true",
];

/// Optional pause-oriented GC tuning, merged unless disabled.
pub const OPTIMIZATION_GC_ARGS: &[&str] = &[
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:G1HeapRegionSize=32M",
];

/// Optional startup tuning, merged unless disabled.
pub const OPTIMIZATION_ADVANCED_ARGS: &[&str] = &[
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:-DontCompileHugeMethods",
    "-Dfile.encoding=UTF-8",
    "-Djdk.lang.Process.allowAmbiguousCommands=true",
];

/// JVM argument template applied when a manifest has no structured
/// arguments of its own.
pub const LEGACY_JVM_TEMPLATE: &[&str] = &[
    "-Djava.library.path=${natives_directory}",
    "-Dminecraft.launcher.brand=${launcher_name}",
    "-Dminecraft.launcher.version=${launcher_version}",
    "-cp",
    "${classpath}",
];

/// Identity substituted for `${launcher_name}` / `${launcher_version}`.
pub const LAUNCHER_NAME: &str = "CraftLaunch";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

// Fixed remote locations of the three fetch-on-first-use artifacts.
pub const UNIFIED_PASS_AGENT_URL: &str = "https://login.mc-user.com:233/index/jar";
pub const YGGDRASIL_AGENT_URL: &str =
    "https://authlib-injector.yushi.moe/artifact/latest/authlib-injector.jar";
pub const WRAPPER_LAUNCHER_URL: &str = "https://cdn.craftlaunch.dev/artifacts/launch_wrapper.jar";

/// Legacy tweak-class flags relocated to the end of the game argument
/// string (exact, case-sensitive matches, trailing space included).
pub const TWEAK_CLASS_TOKENS: &[&str] = &[
    "--tweakClass optifine.OptiFineForgeTweaker ",
    "--tweakClass optifine.OptiFineTweaker ",
];

/// Libraries whose name starts with this prefix must load last on the
/// classpath.
pub const SPECIAL_LOADER_PREFIX: &str = "optifine";
