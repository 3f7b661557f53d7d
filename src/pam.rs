// SPDX-License-Identifier: GPL-3.0-only
//! PAM service module interface
//!
//! The host loads the shared object and calls the `pam_sm_*` symbols below.
//! Only the auth stage does any work; the remaining stages answer with fixed
//! codes so the module can sit in any PAM stack line.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};

use crate::gate::{Gate, Verdict};
use crate::registry::{DeviceRegistry, SystemRegistry};
use crate::sink::{LogSink, Syslog};

/// Result codes handed back to the PAM library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PamResult {
    Success,
    AuthError,
    Ignore,
}

impl PamResult {
    /// Numeric value understood by the platform's PAM implementation
    pub fn code(self) -> c_int {
        match self {
            PamResult::Success => 0,
            PamResult::AuthError => AUTH_ERR,
            PamResult::Ignore => 25,
        }
    }
}

/// `PAM_AUTH_ERR` in Linux-PAM
#[cfg(not(target_os = "macos"))]
const AUTH_ERR: c_int = 7;

/// `PAM_AUTH_ERR` in OpenPAM
#[cfg(target_os = "macos")]
const AUTH_ERR: c_int = 9;

impl From<Verdict> for PamResult {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Granted => PamResult::Success,
            Verdict::Denied | Verdict::Misconfigured => PamResult::AuthError,
        }
    }
}

/// The stage callbacks a service module provides
pub trait PamModule {
    fn authenticate(&self, args: &[String]) -> PamResult;

    fn set_credentials(&self, _args: &[String]) -> PamResult {
        PamResult::Success
    }

    fn check_account(&self, _args: &[String]) -> PamResult {
        PamResult::Success
    }

    fn open_session(&self, _args: &[String]) -> PamResult {
        PamResult::Success
    }

    fn close_session(&self, _args: &[String]) -> PamResult {
        PamResult::Success
    }

    /// Password changes are none of our business
    fn change_auth_token(&self, _args: &[String]) -> PamResult {
        PamResult::Ignore
    }
}

/// Monitor presence module
pub struct MonitorModule<R, S> {
    gate: Gate<R, S>,
}

impl<R: DeviceRegistry, S: LogSink> MonitorModule<R, S> {
    pub fn new(registry: R, sink: S) -> Self {
        Self {
            gate: Gate::new(registry, sink),
        }
    }
}

impl<R: DeviceRegistry, S: LogSink> PamModule for MonitorModule<R, S> {
    fn authenticate(&self, args: &[String]) -> PamResult {
        self.gate.authenticate(args).into()
    }
}

/// Copy the module arguments out of the C argument vector
///
/// # Safety
/// `argv` must point to `argc` pointers, each NULL or a NUL-terminated string.
unsafe fn collect_args(argc: c_int, argv: *const *const c_char) -> Vec<String> {
    if argv.is_null() || argc <= 0 {
        return Vec::new();
    }

    let argv = unsafe { std::slice::from_raw_parts(argv, argc as usize) };
    argv.iter()
        .filter(|arg| !arg.is_null())
        .map(|&arg| unsafe { CStr::from_ptr(arg) }.to_string_lossy().into_owned())
        .collect()
}

fn system_module() -> MonitorModule<SystemRegistry, Syslog> {
    MonitorModule::new(SystemRegistry::default(), Syslog)
}

/// Run one stage callback on a freshly built module, never letting a panic
/// escape
///
/// A panic is logged and answered with `PAM_AUTH_ERR`. The process-wide
/// panic hook is left alone, so the default hook still prints the panic
/// message to the host's stderr before the unwind is caught.
///
/// # Safety
/// `argv` must point to `argc` pointers, each NULL or a NUL-terminated string.
unsafe fn dispatch<M, B, F>(argc: c_int, argv: *const *const c_char, build: B, stage: F) -> c_int
where
    M: PamModule,
    B: FnOnce() -> M,
    F: FnOnce(&M, &[String]) -> PamResult,
{
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let args = unsafe { collect_args(argc, argv) };
        let module = build();
        stage(&module, &args)
    }));

    match result {
        Ok(result) => result.code(),
        Err(_) => {
            Syslog.error("Internal error while checking monitor presence, access denied");
            PamResult::AuthError.code()
        }
    }
}

/// # Safety
/// Called by the PAM library with a valid argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_authenticate(
    _pamh: *mut c_void,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    unsafe { dispatch(argc, argv, system_module, |module, args| module.authenticate(args)) }
}

/// # Safety
/// Called by the PAM library with a valid argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_setcred(
    _pamh: *mut c_void,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    unsafe { dispatch(argc, argv, system_module, |module, args| module.set_credentials(args)) }
}

/// # Safety
/// Called by the PAM library with a valid argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_acct_mgmt(
    _pamh: *mut c_void,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    unsafe { dispatch(argc, argv, system_module, |module, args| module.check_account(args)) }
}

/// # Safety
/// Called by the PAM library with a valid argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_open_session(
    _pamh: *mut c_void,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    unsafe { dispatch(argc, argv, system_module, |module, args| module.open_session(args)) }
}

/// # Safety
/// Called by the PAM library with a valid argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_close_session(
    _pamh: *mut c_void,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    unsafe { dispatch(argc, argv, system_module, |module, args| module.close_session(args)) }
}

/// # Safety
/// Called by the PAM library with a valid argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_chauthtok(
    _pamh: *mut c_void,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    unsafe { dispatch(argc, argv, system_module, |module, args| module.change_auth_token(args)) }
}
