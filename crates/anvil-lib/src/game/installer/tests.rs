use super::*;
use crate::error::{ErrorKind, MissingKind};
use crate::game::rules::RuleEnvironment;
use crate::utils::platform::OsType;
use serde_json::json;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn linux_rules() -> RuleEvaluator {
    RuleEvaluator::with_environment(RuleEnvironment {
        os: OsType::Linux,
        arch: "x86_64".into(),
        os_version: "6.1".into(),
        features: Default::default(),
    })
}

struct FixedVersions(HashMap<String, VersionDescriptor>);

impl VersionSource for FixedVersions {
    fn find_base<'a>(&'a self, name: &'a str) -> BoxFuture<'a, LauncherResult<VersionDescriptor>> {
        Box::pin(async move {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| LauncherError::not_found(MissingKind::Version, name))
        })
    }
}

fn descriptor(id: &str, url: String) -> VersionDescriptor {
    VersionDescriptor {
        id: id.into(),
        source_url: url,
        stable: true,
        sha1: None,
    }
}

async fn serve(server: &MockServer, at: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

fn installer(root: &std::path::Path, server: &MockServer, versions: FixedVersions) -> Installer {
    let settings = LauncherSettings {
        asset_base_url: format!("{}/objects", server.uri()),
        asset_concurrency: 4,
        ..Default::default()
    };
    Installer::new(
        DataLayout::new(root),
        &settings,
        Client::new(),
        linux_rules(),
        Arc::new(versions),
    )
}

/// Mounts a small but complete vanilla version named `1.20.1`.
async fn mount_vanilla(server: &MockServer) -> serde_json::Value {
    let jar = b"client jar".to_vec();
    let lib = b"brigadier".to_vec();
    let icon = b"icon bytes".to_vec();
    let log_config = b"<Configuration/>".to_vec();
    let icon_hash = sha1_hex(&icon);

    let index = serde_json::to_vec(&json!({
        "objects": {"icons/icon_16x16.png": {"hash": icon_hash, "size": icon.len()}}
    }))
    .unwrap();

    serve(server, "/v/client.jar", jar.clone()).await;
    serve(server, "/lib/brigadier.jar", lib.clone()).await;
    serve(server, &format!("/objects/{}/{}", &icon_hash[..2], icon_hash), icon).await;
    serve(server, "/idx/5.json", index.clone()).await;
    serve(server, "/log/client-1.12.xml", log_config.clone()).await;
    Mock::given(method("GET"))
        .and(path("/lib/mac-only.jar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;

    let uri = server.uri();
    let spec = json!({
        "id": "1.20.1",
        "minimumLauncherVersion": 21,
        "type": "release",
        "mainClass": "net.minecraft.client.main.Main",
        "assets": "5",
        "downloads": {"client": {"sha1": sha1_hex(&jar), "size": jar.len(), "url": format!("{}/v/client.jar", uri)}},
        "assetIndex": {"id": "5", "sha1": sha1_hex(&index), "size": index.len(), "totalSize": 10,
                       "url": format!("{}/idx/5.json", uri)},
        "logging": {"client": {"argument": "-Dlog4j.configurationFile=${path}", "type": "log4j2-xml",
                    "file": {"id": "client-1.12.xml", "sha1": sha1_hex(&log_config), "size": 16,
                             "url": format!("{}/log/client-1.12.xml", uri)}}},
        "libraries": [
            {"name": "com.mojang:brigadier:1.1.8",
             "downloads": {"artifact": {"path": "com/mojang/brigadier/1.1.8/brigadier-1.1.8.jar",
                 "sha1": sha1_hex(&lib), "size": lib.len(), "url": format!("{}/lib/brigadier.jar", uri)}}},
            {"name": "ca.weblite:java-objc-bridge:1.1",
             "rules": [{"action": "allow", "os": {"name": "osx"}}],
             "downloads": {"artifact": {"path": "ca/weblite/java-objc-bridge/1.1/java-objc-bridge-1.1.jar",
                 "sha1": "aaaa", "size": 1, "url": format!("{}/lib/mac-only.jar", uri)}}}
        ]
    });
    serve(server, "/v/1.20.1.json", serde_json::to_vec(&spec).unwrap()).await;
    spec
}

#[test]
fn schema_gate_accepts_zero_and_supported() {
    let mut spec = VersionSpec::default();
    assert!(check_schema(&spec).is_ok());
    spec.minimum_launcher_version = Some(21);
    assert!(check_schema(&spec).is_ok());
    spec.minimum_launcher_version = Some(0);
    assert!(check_schema(&spec).is_ok());
    spec.minimum_launcher_version = Some(22);
    assert_eq!(check_schema(&spec).unwrap_err().kind(), ErrorKind::UnsupportedSchema);
    spec.minimum_launcher_version = Some(18);
    assert!(check_schema(&spec).is_err());
}

#[tokio::test]
async fn unsupported_schema_aborts_before_downloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v/future.jar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let spec = json!({
        "id": "future",
        "minimumLauncherVersion": 99,
        "downloads": {"client": {"url": format!("{}/v/future.jar", server.uri())}}
    });
    serve(&server, "/v/future.json", serde_json::to_vec(&spec).unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, FixedVersions(HashMap::new()));
    let err = installer
        .install(&descriptor("future", format!("{}/v/future.json", server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedSchema);
    assert!(!dir.path().join("versions/future/future.jar").exists());
}

#[tokio::test]
async fn installs_every_artifact_of_a_vanilla_version() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    let spec = mount_vanilla(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, FixedVersions(HashMap::new()));
    installer
        .install(&descriptor("1.20.1", format!("{}/v/1.20.1.json", server.uri())))
        .await
        .unwrap();

    let root = dir.path();
    assert!(root.join("versions/1.20.1/1.20.1.json").exists());
    assert_eq!(std::fs::read(root.join("versions/1.20.1/1.20.1.jar")).unwrap(), b"client jar");
    assert!(root
        .join("libraries/com/mojang/brigadier/1.1.8/brigadier-1.1.8.jar")
        .exists());
    assert!(!root
        .join("libraries/ca/weblite/java-objc-bridge/1.1/java-objc-bridge-1.1.jar")
        .exists());
    assert!(root.join("assets/indexes/5.json").exists());
    assert!(root.join("assets/log_configs/client-1.12.xml").exists());

    let index: AssetIndex =
        serde_json::from_slice(&std::fs::read(root.join("assets/indexes/5.json")).unwrap()).unwrap();
    let object = &index.objects["icons/icon_16x16.png"];
    assert!(DataLayout::new(root).asset_object_path(&object.hash).exists());

    // Stored spec is the upstream document.
    let stored: serde_json::Value =
        serde_json::from_slice(&std::fs::read(root.join("versions/1.20.1/1.20.1.json")).unwrap())
            .unwrap();
    assert_eq!(stored, spec);
}

#[tokio::test]
async fn loader_version_installs_its_base_first() {
    let server = MockServer::start().await;
    mount_vanilla(&server).await;
    let uri = server.uri();
    serve(&server, "/maven/net/fabricmc/fabric-loader/0.15.0/fabric-loader-0.15.0.jar", b"loader".to_vec()).await;
    let loader_spec = json!({
        "id": "fabric-loader-0.15.0-1.20.1",
        "inheritsFrom": "1.20.1",
        "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient",
        "arguments": {"game": [], "jvm": ["-DFabricMcEmu= net.minecraft.client.main.Main "]},
        "libraries": [{"name": "net.fabricmc:fabric-loader:0.15.0", "url": format!("{}/maven/", uri)}]
    });
    serve(&server, "/loader/profile.json", serde_json::to_vec(&loader_spec).unwrap()).await;

    let versions = FixedVersions(HashMap::from([(
        "1.20.1".to_string(),
        descriptor("1.20.1", format!("{}/v/1.20.1.json", uri)),
    )]));
    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, versions);
    installer
        .install(&descriptor(
            "fabric-loader-0.15.0-1.20.1",
            format!("{}/loader/profile.json", uri),
        ))
        .await
        .unwrap();

    let root = dir.path();
    assert!(root.join("versions/1.20.1/1.20.1.jar").exists());
    assert!(root
        .join("versions/fabric-loader-0.15.0-1.20.1/fabric-loader-0.15.0-1.20.1.json")
        .exists());
    assert!(!root
        .join("versions/fabric-loader-0.15.0-1.20.1/fabric-loader-0.15.0-1.20.1.jar")
        .exists());
    assert!(root
        .join("libraries/net/fabricmc/fabric-loader/0.15.0/fabric-loader-0.15.0.jar")
        .exists());
}

#[tokio::test]
async fn unknown_base_version_is_not_found() {
    let server = MockServer::start().await;
    let spec = json!({"id": "orphan", "inheritsFrom": "0.0.0"});
    serve(&server, "/orphan.json", serde_json::to_vec(&spec).unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, FixedVersions(HashMap::new()));
    let err = installer
        .install(&descriptor("orphan", format!("{}/orphan.json", server.uri())))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn corrupted_asset_object_fails_the_install() {
    let server = MockServer::start().await;
    let claimed = sha1_hex(b"expected");
    let index = serde_json::to_vec(&json!({
        "objects": {"minecraft/sounds/a.ogg": {"hash": claimed, "size": 8}}
    }))
    .unwrap();
    serve(&server, "/idx/1.json", index).await;
    serve(&server, &format!("/objects/{}/{}", &claimed[..2], claimed), b"tampered".to_vec()).await;
    let spec = json!({
        "id": "broken",
        "assetIndex": {"id": "1", "totalSize": 8, "url": format!("{}/idx/1.json", server.uri())}
    });
    serve(&server, "/broken.json", serde_json::to_vec(&spec).unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, FixedVersions(HashMap::new()));
    let err = installer
        .install(&descriptor("broken", format!("{}/broken.json", server.uri())))
        .await
        .unwrap_err();

    match err {
        LauncherError::Batch { failures, total } => {
            assert_eq!(total, 1);
            assert_eq!(failures[0].artifact, "minecraft/sounds/a.ogg");
            assert_eq!(failures[0].error.kind(), ErrorKind::Integrity);
        }
        other => panic!("expected batch failure, got {:?}", other),
    }
    assert!(!DataLayout::new(dir.path()).asset_object_path(&claimed).exists());
}

#[tokio::test]
async fn library_path_leaving_the_data_dir_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lib/pwned.jar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    let spec = json!({
        "id": "hostile",
        "libraries": [{"name": "org.example:pwned:1.0",
                       "downloads": {"artifact": {"path": "../../escaped/pwned.jar", "size": 7,
                                     "url": format!("{}/lib/pwned.jar", server.uri())}}}]
    });
    serve(&server, "/hostile.json", serde_json::to_vec(&spec).unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let installer = installer(&data, &server, FixedVersions(HashMap::new()));
    let err = installer
        .install(&descriptor("hostile", format!("{}/hostile.json", server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(!dir.path().join("escaped/pwned.jar").exists());
}

#[tokio::test]
async fn asset_index_with_a_bad_hash_schedules_nothing() {
    let server = MockServer::start().await;
    let good = sha1_hex(b"fine");
    let index = serde_json::to_vec(&json!({
        "objects": {
            "icons/ok.png": {"hash": good, "size": 4},
            "icons/evil.png": {"hash": "../../../../escaped", "size": 4}
        }
    }))
    .unwrap();
    serve(&server, "/idx/1.json", index).await;
    Mock::given(method("GET"))
        .and(path(format!("/objects/{}/{}", &good[..2], good)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fine".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    let spec = json!({
        "id": "hostile",
        "assetIndex": {"id": "1", "totalSize": 8, "url": format!("{}/idx/1.json", server.uri())}
    });
    serve(&server, "/hostile.json", serde_json::to_vec(&spec).unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, FixedVersions(HashMap::new()));
    let err = installer
        .install(&descriptor("hostile", format!("{}/hostile.json", server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(matches!(err, LauncherError::UnsafePath { what: "asset hash", .. }));
    assert!(!dir.path().join("assets/objects").exists());
}

#[tokio::test]
async fn log_config_id_must_be_a_file_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/log/pwned.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<Configuration/>".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    let spec = json!({
        "id": "hostile",
        "logging": {"client": {"argument": "-Dlog4j.configurationFile=${path}", "type": "log4j2-xml",
                    "file": {"id": "../../pwned.xml", "size": 16,
                             "url": format!("{}/log/pwned.xml", server.uri())}}}
    });
    serve(&server, "/hostile.json", serde_json::to_vec(&spec).unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let installer = installer(&data, &server, FixedVersions(HashMap::new()));
    let err = installer
        .install(&descriptor("hostile", format!("{}/hostile.json", server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(!dir.path().join("pwned.xml").exists());
}

#[tokio::test]
async fn version_id_with_separators_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let installer = installer(dir.path(), &server, FixedVersions(HashMap::new()));
    let err = installer
        .fetch_spec(&descriptor("../1.20.1", format!("{}/v/1.20.1.json", server.uri())))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}
