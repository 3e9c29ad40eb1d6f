use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_lzw12").to_string()
}

#[test]
fn cli_compress_decompress_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.lzw");
    let output = dir.path().join("output.txt");

    std::fs::write(&input, b"TOBEORNOTTOBEORTOBEORNOT").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .arg("decompress")
        .arg(&packed)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&input).unwrap()
    );
}

#[test]
fn cli_raw_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lzw");
    let output = dir.path().join("output.bin");

    std::fs::write(&input, b"AAAA").unwrap();

    let st = Command::new(bin())
        .args(["compress", "--raw"])
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&packed).unwrap(),
        vec![0x04, 0x11, 0x00, 0x04, 0x10]
    );

    let st = Command::new(bin())
        .args(["decompress", "--raw"])
        .arg(&packed)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"AAAA");
}

#[test]
fn cli_verbose_reports_byte_counts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lzw");

    std::fs::write(&input, b"AAAA").unwrap();

    let out = Command::new(bin())
        .args(["-v", "compress", "--raw"])
        .arg(&input)
        .arg(&packed)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), "bytes read = 4, bytes written = 5");
}

#[test]
fn cli_quiet_suppresses_byte_counts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lzw");

    std::fs::write(&input, b"AAAA").unwrap();

    let out = Command::new(bin())
        .args(["-q", "compress"])
        .arg(&input)
        .arg(&packed)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lzw");

    std::fs::write(&input, b"payload").unwrap();
    std::fs::write(&packed, b"existing").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&packed).unwrap(), b"existing");

    let st = Command::new(bin())
        .args(["--force", "compress"])
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
    assert_ne!(std::fs::read(&packed).unwrap(), b"existing");
}

#[test]
fn cli_decompress_garbage_fails() {
    let dir = tempdir().unwrap();
    let packed = dir.path().join("garbage.lzw");
    let output = dir.path().join("output.bin");

    std::fs::write(&packed, [0xFF, 0x01, 0x02]).unwrap();

    let out = Command::new(bin())
        .arg("decompress")
        .arg(&packed)
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("malformed stream"));
    assert!(!output.exists());
}

#[test]
fn cli_json_stats() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lzw");

    std::fs::write(&input, b"abababab").unwrap();

    let out = Command::new(bin())
        .args(["--json", "compress"])
        .arg(&input)
        .arg(&packed)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    let json: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(json["command"], "compress");
    assert_eq!(json["bytes_read"], 8);
}

#[test]
fn cli_inspect_prints_header() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lzw");

    std::fs::write(&input, b"AAAA").unwrap();
    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());

    let out = Command::new(bin()).arg("inspect").arg(&packed).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("code count:         3"), "stdout: {stdout}");
    assert!(stdout.contains("decoded length:     4"), "stdout: {stdout}");
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("CODE_BITS=12"));
}
