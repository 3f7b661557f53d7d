// SPDX-License-Identifier: GPL-3.0-only
//! IOKit display services
//!
//! Each attached panel is backed by an `AppleCLCD2` service whose registry
//! entry carries an `EDID UUID` string property.

use std::ffi::{CString, c_char, c_void};

use core_foundation::base::{CFType, TCFType};
use core_foundation::string::CFString;

use crate::error::{GateError, Result};

use super::{DeviceClass, DeviceRegistry, DisplayDevice, Property};

#[allow(non_camel_case_types)]
type kern_return_t = libc::c_int;
#[allow(non_camel_case_types)]
type io_object_t = libc::c_uint;

const KERN_SUCCESS: kern_return_t = 0;

/// `kIOMainPortDefault`
const MAIN_PORT_DEFAULT: libc::c_uint = 0;

/// Registry property holding the identifier
const EDID_UUID_KEY: &str = "EDID UUID";

#[link(name = "IOKit", kind = "framework")]
unsafe extern "C" {
    fn IOServiceMatching(name: *const c_char) -> *mut c_void;
    fn IOServiceGetMatchingServices(
        main_port: libc::c_uint,
        matching: *const c_void,
        existing: *mut io_object_t,
    ) -> kern_return_t;
    fn IOIteratorNext(iterator: io_object_t) -> io_object_t;
    fn IOObjectRelease(object: io_object_t) -> kern_return_t;
    fn IORegistryEntryCreateCFProperty(
        entry: io_object_t,
        key: *const c_void,
        allocator: *const c_void,
        options: u32,
    ) -> *const c_void;
    fn IORegistryEntryGetName(entry: io_object_t, name: *mut c_char) -> kern_return_t;
}

/// Owned IOKit object reference, released on drop
#[derive(Debug)]
struct IoObject(io_object_t);

impl Drop for IoObject {
    fn drop(&mut self) {
        unsafe {
            IOObjectRelease(self.0);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IoKitRegistry;

/// One display controller service
#[derive(Debug)]
pub struct IoService(IoObject);

impl DisplayDevice for IoService {
    fn name(&self) -> String {
        // io_name_t
        let mut buf = [0 as c_char; 128];
        let kr = unsafe { IORegistryEntryGetName(self.0.0, buf.as_mut_ptr()) };
        if kr != KERN_SUCCESS {
            return format!("service {:#x}", self.0.0);
        }
        unsafe { std::ffi::CStr::from_ptr(buf.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    fn identifier(&self) -> Property {
        let key = CFString::from_static_string(EDID_UUID_KEY);
        let raw = unsafe {
            IORegistryEntryCreateCFProperty(
                self.0.0,
                key.as_concrete_TypeRef() as *const c_void,
                std::ptr::null(),
                0,
            )
        };
        if raw.is_null() {
            return Property::Absent;
        }

        // Create rule: the wrapper owns the returned reference.
        let value = unsafe { CFType::wrap_under_create_rule(raw) };
        match value.downcast::<CFString>() {
            Some(uuid) => Property::Text(uuid.to_string()),
            None => Property::Unexpected(format!("{EDID_UUID_KEY} is not a string")),
        }
    }
}

impl DeviceRegistry for IoKitRegistry {
    type Device = IoService;

    fn enumerate(&self, class: DeviceClass) -> Result<Vec<IoService>> {
        let name = CString::new(class.name()).map_err(|e| {
            GateError::enumeration(class.name(), std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        // The matching dictionary is consumed by IOServiceGetMatchingServices.
        let matching = unsafe { IOServiceMatching(name.as_ptr()) };
        if matching.is_null() {
            return Err(GateError::enumeration(
                class.name(),
                std::io::Error::other("IOServiceMatching returned NULL"),
            ));
        }

        let mut iterator: io_object_t = 0;
        let kr = unsafe { IOServiceGetMatchingServices(MAIN_PORT_DEFAULT, matching, &mut iterator) };
        if kr != KERN_SUCCESS {
            return Err(GateError::enumeration(
                class.name(),
                std::io::Error::other(format!("IOServiceGetMatchingServices failed: {kr}")),
            ));
        }
        let iterator = IoObject(iterator);

        let mut services = Vec::new();
        loop {
            let service = unsafe { IOIteratorNext(iterator.0) };
            if service == 0 {
                break;
            }
            services.push(IoService(IoObject(service)));
        }

        debug!("Found {} {} service(s)", services.len(), class);
        Ok(services)
    }
}
