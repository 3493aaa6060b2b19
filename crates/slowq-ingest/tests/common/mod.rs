use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;

pub fn slow_line(second: u32, ms: u64, sql: &str) -> String {
    format!(
        "2024-05-14 09:{:02}:{:02}.318 WARN  [exec-{}] c.e.SlowQueryLogger - SlowQuery: {} milliseconds. SQL: 'HikariProxyPreparedStatement@{} wrapping {}'",
        second / 60,
        second % 60,
        second,
        ms,
        1000 + second,
        sql
    )
}

/// `count` slow lines cycling over a few statements, interleaved with noise
pub fn sample_log(count: u32, base_ms: u64) -> String {
    let statements = [
        "select * from SoftwareComponent where refId=?",
        "insert into AssetChangeLog (id, ts) values (?, ?)",
        "update Job set state=? where id=?",
        "delete from Session where expires < ?",
    ];
    let mut out = String::new();
    for i in 0..count {
        out.push_str(&slow_line(i, base_ms + i as u64 * 7, statements[i as usize % 4]));
        out.push('\n');
        out.push_str("2024-05-14 09:00:00.000 INFO  heartbeat ok\n");
    }
    out
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn write_tar_gz(path: &Path, members: &[(&str, &[u8])]) {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    std::fs::write(path, gzip(&builder.into_inner().unwrap())).unwrap();
}
