//! Clock, timer and random number call sites.

use crate::engine::Player;
use extplay_calls::{
    FileTime, GetLocalTime, GetProcessTimes, GetSystemTime, GetSystemTimeAsFileTime,
    GetTickCount, GetTimeZoneInfo, LocalTime, QueryPerfCounter, QueryPerfFreq, Rand, Sleep,
    Srand, SystemTime, Time, TimeZoneInfo, Tm,
};
use extplay_core::PlaybackResult;

/// Times reported by `GetProcessTimes()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessTimes {
    /// Process creation time
    pub creation: FileTime,
    /// Process exit time
    pub exit: FileTime,
    /// Time spent in kernel mode
    pub kernel: FileTime,
    /// Time spent in user mode
    pub user: FileTime,
}

impl Player {
    /// `time()`: recorded seconds since the epoch, also stored in `out`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn time(&mut self, out: Option<&mut u32>) -> PlaybackResult<u32> {
        let res = self.play(Time::new(), "time", |rec| Ok(rec.res))?;
        if let Some(out) = out {
            *out = res;
        }
        Ok(res)
    }

    /// `localtime()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn localtime(&mut self, time: u32) -> PlaybackResult<Tm> {
        self.play(LocalTime::new(time), "localtime", |rec| Ok(rec.res))
    }

    /// `srand()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn srand(&mut self, seed: u32) -> PlaybackResult<()> {
        self.play(Srand::new(seed), "srand", |_| Ok(()))
    }

    /// `rand()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn rand(&mut self) -> PlaybackResult<i32> {
        self.play(Rand::new(), "rand", |rec| Ok(rec.res))
    }

    /// `Sleep()`; returns immediately
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn sleep(&mut self, msec: u32) -> PlaybackResult<()> {
        self.play(Sleep::new(msec), "Sleep", |_| Ok(()))
    }

    /// `QueryPerformanceCounter()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn query_perf_counter(&mut self, counter: &mut i64) -> PlaybackResult<bool> {
        self.play(QueryPerfCounter::new(), "QueryPerfCounter", |rec| {
            *counter = rec.counter;
            Ok(rec.res)
        })
    }

    /// `QueryPerformanceFrequency()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn query_perf_freq(&mut self, freq: &mut i64) -> PlaybackResult<bool> {
        self.play(QueryPerfFreq::new(), "QueryPerfFreq", |rec| {
            *freq = rec.freq;
            Ok(rec.res)
        })
    }

    /// `GetTickCount()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_tick_count(&mut self) -> PlaybackResult<u32> {
        self.play(GetTickCount::new(), "GetTickCount", |rec| Ok(rec.res))
    }

    /// `GetLocalTime()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_local_time(&mut self) -> PlaybackResult<SystemTime> {
        self.play(GetLocalTime::new(), "GetLocalTime", |rec| Ok(rec.res))
    }

    /// `GetSystemTime()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_system_time(&mut self) -> PlaybackResult<SystemTime> {
        self.play(GetSystemTime::new(), "GetSystemTime", |rec| Ok(rec.res))
    }

    /// `GetTimeZoneInformation()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_time_zone_info(&mut self) -> PlaybackResult<TimeZoneInfo> {
        self.play(GetTimeZoneInfo::new(), "GetTimeZoneInfo", |rec| Ok(rec.res))
    }

    /// `GetProcessTimes()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_process_times(&mut self, times: &mut ProcessTimes) -> PlaybackResult<bool> {
        self.play(GetProcessTimes::new(), "GetProcessTimes", |rec| {
            *times = ProcessTimes {
                creation: rec.creation_time,
                exit: rec.exit_time,
                kernel: rec.kernel_time,
                user: rec.user_time,
            };
            Ok(rec.res)
        })
    }

    /// `GetSystemTimeAsFileTime()`
    ///
    /// # Errors
    ///
    /// Returns error if the trace does not hold this call next
    pub fn get_system_time_as_file_time(&mut self) -> PlaybackResult<FileTime> {
        self.play(
            GetSystemTimeAsFileTime::new(),
            "GetSystemTimeAsFileTime",
            |rec| Ok(rec.system_time),
        )
    }
}
