use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, TimeDelta};

use crate::logging;

/// 依日期切檔，單檔超過大小時遞增世代編號，並清除過期的日誌
pub struct Rotate {
    /// 檔名模式，例如 "log/%Y-%m-%d-name.log"
    fn_pattern: String,
    /// 當前完整檔名（含 generation）
    cur_fn: String,
    /// 當前基礎檔名（不含 generation，由日期決定）
    cur_base_fn: String,
    out_fh: Option<BufWriter<File>>,
    /// 只增不減，不覆蓋舊檔案
    generation: u32,
    max_size: u64,
    current_size: u64,
    max_age: TimeDelta,
}

impl Rotate {
    /// # Arguments
    /// * `fn_pattern` - 檔名模式，例如 "log/%Y-%m-%d-app.log"
    /// * `max_size` - 單檔最大大小 (bytes)
    /// * `max_age_days` - 日誌保留天數
    pub fn with_options(fn_pattern: String, max_size: u64, max_age_days: i64) -> Self {
        Rotate {
            fn_pattern,
            cur_fn: String::new(),
            cur_base_fn: String::new(),
            out_fh: None,
            generation: 0,
            max_size,
            current_size: 0,
            max_age: TimeDelta::try_days(max_age_days).unwrap_or(TimeDelta::days(7)),
        }
    }

    /// 寫入日誌訊息，自動處理日期切檔與大小輪轉
    pub fn write_msg(&mut self, now: DateTime<Local>, msg: &[u8]) -> Result<()> {
        let base_fn = self.generate_base_fn(now);

        if base_fn != self.cur_base_fn || self.out_fh.is_none() {
            self.generation = 0;
            self.cur_base_fn = base_fn;
            self.open_new_file()?;
            self.cleanup_old_files(now);
        }

        if self.current_size > 0 && self.current_size + msg.len() as u64 > self.max_size {
            self.generation += 1;
            self.open_new_file()?;
        }

        let writer = self
            .out_fh
            .as_mut()
            .ok_or_else(|| anyhow!("Failed to get writer"))?;
        writer.write_all(msg)?;
        self.current_size += msg.len() as u64;

        Ok(())
    }

    pub fn flush(&mut self) {
        if let Some(writer) = self.out_fh.as_mut() {
            let _ = writer.flush();
        }
    }

    fn generate_base_fn(&self, now: DateTime<Local>) -> String {
        now.format(&self.fn_pattern).to_string()
    }

    /// generation = 0: "log/2025-02-03-app.log"
    /// generation = 1: "log/2025-02-03-app.1.log"
    fn generate_full_fn(&self, base_fn: &str, generation: u32) -> String {
        if generation == 0 {
            return base_fn.to_string();
        }

        let path = Path::new(base_fn);
        let parent = path.parent().unwrap_or(Path::new(""));
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("log");

        parent
            .join(format!("{}.{}.{}", stem, generation, ext))
            .to_string_lossy()
            .to_string()
    }

    fn open_new_file(&mut self) -> Result<()> {
        self.flush();

        let filename = self.generate_full_fn(&self.cur_base_fn, self.generation);
        if let Some(parent) = Path::new(&filename).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filename)?;

        self.current_size = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.out_fh = Some(BufWriter::with_capacity(4096, file));
        self.cur_fn = filename;

        Ok(())
    }

    /// 刪除同目錄下修改時間早於保留期限的 .log 檔，當前檔案除外
    fn cleanup_old_files(&self, now: DateTime<Local>) {
        let files = match Self::files_in_directory(&self.cur_fn) {
            Ok(files) => files,
            Err(why) => {
                logging::error_console(format!(
                    "Failed to list_files_in_directory because {:?}",
                    why
                ));
                return;
            }
        };

        let cut_off = (now - self.max_age).timestamp().max(0) as u64;
        let current = Path::new(&self.cur_fn);

        for file in files {
            if file == current || file.extension().and_then(|s| s.to_str()) != Some("log") {
                continue;
            }

            let expired = fs::metadata(&file)
                .and_then(|metadata| metadata.modified())
                .ok()
                .and_then(|system_time| system_time.duration_since(UNIX_EPOCH).ok())
                .is_some_and(|duration| duration.as_secs() <= cut_off);

            if !expired {
                continue;
            }

            if let Err(why) = fs::remove_file(&file) {
                logging::error_console(format!(
                    "couldn't remove the file({}). because {:?}",
                    file.display(),
                    why
                ));
            }
        }
    }

    fn files_in_directory<P: AsRef<Path>>(file_path: P) -> Result<Vec<PathBuf>, io::Error> {
        let parent_dir = file_path
            .as_ref()
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Parent directory not found"))?;
        let parent_dir = if parent_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent_dir
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(parent_dir)? {
            files.push(entry?.path());
        }

        Ok(files)
    }
}

impl Drop for Rotate {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(dir: &Path, name: &str) -> String {
        dir.join(format!("%Y-%m-%d-{}.log", name))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_generation_filename() {
        let r = Rotate::with_options("log/%Y-%m-%d-app.log".to_string(), 1024, 7);

        let base = "log/2025-02-03-app.log";
        assert_eq!(r.generate_full_fn(base, 0), "log/2025-02-03-app.log");
        assert_eq!(r.generate_full_fn(base, 1), "log/2025-02-03-app.1.log");
        assert_eq!(r.generate_full_fn(base, 2), "log/2025-02-03-app.2.log");
    }

    #[test]
    fn test_basic_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = Rotate::with_options(pattern(dir.path(), "basic"), 1024, 7);
        let now = Local::now();

        r.write_msg(now, "GET:twse 200 OK 35 ms\r\n".as_bytes()).unwrap();
        r.flush();

        let written = fs::read_to_string(&r.cur_fn).unwrap();
        assert_eq!(written, "GET:twse 200 OK 35 ms\r\n");
        assert_eq!(r.generation, 0);
    }

    #[test]
    fn test_size_rotation_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = Rotate::with_options(pattern(dir.path(), "size"), 64, 7);
        let now = Local::now();

        for i in 0..10 {
            let msg = format!("Line {:03} - {}\r\n", i, "X".repeat(20));
            r.write_msg(now, msg.as_bytes()).unwrap();
        }
        r.flush();

        assert!(r.generation >= 3, "generation: {}", r.generation);
        let files = fs::read_dir(dir.path()).unwrap().count() as u32;
        assert_eq!(files, r.generation + 1);
    }

    #[test]
    fn test_date_change_cleans_expired_files() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("stale.log");
        let other = dir.path().join("keep.txt");
        fs::write(&stale, "old").unwrap();
        fs::write(&other, "not a log").unwrap();

        let mut r = Rotate::with_options(pattern(dir.path(), "clean"), 1024, 0);
        let tomorrow = Local::now() + TimeDelta::days(1);
        r.write_msg(tomorrow, b"Day 2\r\n").unwrap();
        r.flush();

        assert!(!stale.exists());
        assert!(other.exists());
        assert!(Path::new(&r.cur_fn).exists());
    }
}
