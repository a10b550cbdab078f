use std::{
    fmt::Write as _,
    sync::Mutex,
    thread,
    time::Duration,
};

use chrono::{format::DelayedFormat, DateTime, Local};
use crossbeam_channel::{bounded, unbounded, Sender};
use once_cell::sync::Lazy;

use crate::{config::SETTINGS, logging::rotate::Rotate};

pub mod rotate;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 所有 Logger 的寫入通道，flush 時逐一通知
static SINKS: Lazy<Mutex<Vec<Sender<LogEvent>>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// 等待背景線程寫完的上限
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// 累積到這個大小就寫入檔案
const BATCH_SIZE: usize = 4096;

pub struct Logger {
    writer: Sender<LogEvent>,
}

enum LogEvent {
    Message(LogMessage),
    Flush(Sender<()>),
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        let (tx, rx) = unbounded::<LogEvent>();
        let mut rotate = Rotate::with_options(
            format!("{}/%Y-%m-%d-{}.log", SETTINGS.log.dir, log_name),
            SETTINGS.log.max_size,
            SETTINGS.log.max_age_days,
        );

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let mut line = String::with_capacity(BATCH_SIZE);

            for event in &rx {
                match event {
                    LogEvent::Message(received) => {
                        if writeln!(
                            &mut line,
                            "{} {} {}",
                            received.created_at.format("%F %X%.6f"),
                            received.level,
                            received.msg
                        )
                        .is_err()
                        {
                            continue;
                        }

                        if rx.is_empty() || line.len() >= BATCH_SIZE {
                            write_batch(&mut rotate, &mut line);
                        }
                    }
                    LogEvent::Flush(ack) => {
                        write_batch(&mut rotate, &mut line);
                        let _ = ack.send(());
                    }
                }
            }
        });

        if let Ok(mut sinks) = SINKS.lock() {
            sinks.push(tx.clone());
        }

        Logger { writer: tx }
    }

    pub fn info(&self, log: impl Into<String>) {
        self.send(log::Level::Info, log.into());
    }

    pub fn warn(&self, log: impl Into<String>) {
        self.send(log::Level::Warn, log.into());
    }

    pub fn error(&self, log: impl Into<String>) {
        self.send(log::Level::Error, log.into());
    }

    pub fn debug(&self, log: impl Into<String>) {
        self.send(log::Level::Debug, log.into());
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(LogEvent::Message(LogMessage::new(level, msg))) {
            error_console(why.to_string());
        }
    }
}

fn write_batch(rotate: &mut Rotate, line: &mut String) {
    if line.is_empty() {
        return;
    }

    if let Err(why) = rotate.write_msg(Local::now(), line.as_bytes()) {
        error_console(format!("Failed to write to log file. because:{:#?}", why));
        info_console(line.clone());
    }

    rotate.flush();
    line.clear();
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }
}

/// 等待所有 Logger 將已排入的訊息寫入檔案
pub fn flush() {
    let sinks = match SINKS.lock() {
        Ok(sinks) => sinks.clone(),
        Err(_) => return,
    };

    for sink in sinks {
        let (ack_tx, ack_rx) = bounded::<()>(1);
        if sink.send(LogEvent::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv_timeout(FLUSH_TIMEOUT);
        }
    }
}

pub fn info_file_async(log: impl Into<String>) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: impl Into<String>) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: impl Into<String>) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: impl Into<String>) {
    LOGGER.debug(log);
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    eprintln!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}
