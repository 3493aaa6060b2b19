use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;

pub fn slow_line(ts: &str, ms: u64, sql: &str) -> String {
    format!(
        "{} WARN  [http-nio-8080-exec-3] c.e.r.SlowQueryLogger - SlowQuery: {} milliseconds. SQL: 'HikariProxyPreparedStatement@1183 wrapping {}'\n",
        ts, ms, sql
    )
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

/// A directory with one plain log, one gzip rotation, one archive and one unrelated file
pub fn write_log_tree(root: &Path) {
    let plain = [
        slow_line("2024-05-14 09:12:44.318", 524, "select * from SoftwareComponent where refId=2938"),
        "2024-05-14 09:12:45.000 INFO  request served\n".to_string(),
        slow_line("2024-05-14 09:13:01.002", 130, "insert into AssetChangeLog values (?)"),
    ]
    .concat();
    std::fs::write(root.join("repository.log"), plain).unwrap();

    let rotated = [
        slow_line("2024-05-13 23:59:59.999", 2648, "insert into AssetChangeLog values (?)"),
        slow_line("2024-05-13 22:00:00.000", 75, "delete from Session where expires < ?"),
    ]
    .concat();
    std::fs::write(
        root.join("repository.2024-05-13.log.gz"),
        gzip(rotated.as_bytes()),
    )
    .unwrap();

    std::fs::create_dir_all(root.join("archive")).unwrap();
    let archived = slow_line("2024-05-12 08:00:00.000", 12000, "update Job set state=? where id=?");
    write_tar_gz(
        &root.join("archive/repository.tar.gz"),
        &[
            ("support/notes.txt", b"not a log"),
            ("support/logs/repository.log", archived.as_bytes()),
        ],
    );

    std::fs::write(
        root.join("application.log"),
        slow_line("2024-05-14 10:00:00.000", 9999, "select * from Ignored"),
    )
    .unwrap();
}
