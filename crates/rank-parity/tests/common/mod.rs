#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// 左側スタンドイン。dataset に応じて成功・失敗・ハングを演じる。
pub const LEFT_SH: &str = r#"#!/bin/sh
echo "$1 $2 $3" >> calls.log
case "$1" in
  broken) echo "ValueError: Unknown dataset: $1" >&2; exit 1 ;;
  hang) exec sleep 30 ;;
  silent) exit 0 ;;
esac
printf ',score,rank\na,1.0,1\nb,2.0,2\nc,3.0,3\n' > left.csv
"#;

/// 右側スタンドイン（参照順序 c,a,b と列順 rank,score で書く）。
///
/// 左側は score を `1.0` 形式、右側は整数 `1` で書く。
pub const RIGHT_SH: &str = r#"#!/bin/sh
case "$1" in
  drift) B=2.0000001 ;;
  extra) printf ',score,rank\na,1,1\nb,2,2\nc,3,3\nd,4,4\n' > right.csv; exit 0 ;;
  *) B=2 ;;
esac
printf ',rank,score\nc,3,3\na,1,1\nb,2,%s\n' "$B" > right.csv
"#;

pub fn write_scripts(dir: &Path) {
    fs::write(dir.join("left.sh"), LEFT_SH).unwrap();
    fs::write(dir.join("right.sh"), RIGHT_SH).unwrap();
}

pub fn sides_toml() -> String {
    r#"
[left]
label = "Left"
runtime = "sh"
script = "left.sh"
artifact = "left.csv"

[right]
label = "Right"
runtime = "sh"
script = "right.sh"
artifact = "right.csv"
"#
    .to_string()
}

pub fn scenario_toml(dataset: &str, full: bool, n: Option<u64>, description: &str) -> String {
    let n = n.map(|v| format!("N = {v}\n")).unwrap_or_default();
    format!(
        "\n[[scenarios]]\ndataset = \"{dataset}\"\nfull = {full}\n{n}description = \"{description}\"\n"
    )
}
