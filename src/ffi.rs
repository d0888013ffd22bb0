//! C ABI over [`Context`].
//!
//! Contexts are boxed and handed out as opaque pointers. Voice handles are
//! plain integers in `0..MAX_VOICES`. Null pointers and unknown handles make
//! every call a no-op; calls that return a value report `-1` (or `-1.0`).

use std::{ptr, slice};

use crate::{
    error::{STATUS_BAD_HANDLE, STATUS_OK, STATUS_TOO_SHORT},
    instrument::SampleDataPolicy,
    synth::{Context, VoiceHandle},
};

/// Creates a context. Returns null for a sample rate below 50 Hz.
#[no_mangle]
#[cold]
pub extern "C" fn tv_init(sample_rate: i32) -> *mut Context {
    let Ok(sample_rate) = u32::try_from(sample_rate) else {
        return ptr::null_mut();
    };
    match Context::new(sample_rate) {
        Ok(ctx) => Box::into_raw(Box::new(ctx)),
        Err(err) => {
            log::error!("tv_init: {err}");
            ptr::null_mut()
        }
    }
}

/// # Safety
///
/// `ctx` must be null or a pointer returned by [`tv_init`] that has not been
/// disposed yet.
#[no_mangle]
pub unsafe extern "C" fn tv_dispose(ctx: *mut Context) {
    if !ctx.is_null() {
        drop(Box::from_raw(ctx));
    }
}

/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`].
#[no_mangle]
pub unsafe extern "C" fn tv_create_voice(ctx: *mut Context) -> i32 {
    let Some(ctx) = ctx.as_mut() else {
        return -1;
    };
    ctx.create_voice().map_or(-1, VoiceHandle::raw)
}

/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`].
#[no_mangle]
pub unsafe extern "C" fn tv_destroy_voice(ctx: *mut Context, handle: i32) {
    if let (Some(ctx), Some(handle)) = (ctx.as_mut(), VoiceHandle::from_raw(handle)) {
        ctx.destroy_voice(handle);
    }
}

/// Returns 0 on success or a negative status code. A PCM blob shorter than its
/// declared sample length is rejected with `-2`.
///
/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`]; `data` must be null
/// or point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn tv_load_instrument(
    ctx: *mut Context,
    handle: i32,
    data: *const u8,
    len: i32,
) -> i32 {
    load_instrument(ctx, handle, data, len, SampleDataPolicy::Strict)
}

/// Same as [`tv_load_instrument`], but missing PCM sample bytes are filled
/// with silence instead of failing.
///
/// # Safety
///
/// Same contract as [`tv_load_instrument`].
#[no_mangle]
pub unsafe extern "C" fn tv_load_instrument_zero_fill(
    ctx: *mut Context,
    handle: i32,
    data: *const u8,
    len: i32,
) -> i32 {
    load_instrument(ctx, handle, data, len, SampleDataPolicy::ZeroFill)
}

unsafe fn load_instrument(
    ctx: *mut Context,
    handle: i32,
    data: *const u8,
    len: i32,
    policy: SampleDataPolicy,
) -> i32 {
    let (Some(ctx), Some(handle)) = (ctx.as_mut(), VoiceHandle::from_raw(handle)) else {
        return STATUS_BAD_HANDLE;
    };
    if data.is_null() {
        return STATUS_BAD_HANDLE;
    }
    let Ok(len) = usize::try_from(len) else {
        return STATUS_TOO_SHORT;
    };

    let blob = slice::from_raw_parts(data, len);
    match ctx.load_instrument_with(handle, blob, policy) {
        Ok(()) => STATUS_OK,
        Err(err) => {
            log::warn!("tv_load_instrument: {err}");
            err.status_code()
        }
    }
}

/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`].
#[no_mangle]
pub unsafe extern "C" fn tv_note_on(ctx: *mut Context, handle: i32, note: i32, velocity: i32) {
    if let (Some(ctx), Some(handle)) = (ctx.as_mut(), VoiceHandle::from_raw(handle)) {
        ctx.note_on(handle, clamp_midi(note), clamp_midi(velocity));
    }
}

/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`].
#[no_mangle]
pub unsafe extern "C" fn tv_note_off(ctx: *mut Context, handle: i32) {
    if let (Some(ctx), Some(handle)) = (ctx.as_mut(), VoiceHandle::from_raw(handle)) {
        ctx.note_off(handle);
    }
}

/// Fills `num_samples` frames of each channel buffer.
///
/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`]; `out_left` and
/// `out_right` must be null or point to `num_samples` writable, non-overlapping
/// floats.
#[no_mangle]
pub unsafe extern "C" fn tv_render(
    ctx: *mut Context,
    handle: i32,
    out_left: *mut f32,
    out_right: *mut f32,
    num_samples: i32,
) {
    let Ok(frames) = usize::try_from(num_samples) else {
        return;
    };
    if out_left.is_null() || out_right.is_null() {
        return;
    }
    let left = slice::from_raw_parts_mut(out_left, frames);
    let right = slice::from_raw_parts_mut(out_right, frames);

    match (ctx.as_mut(), VoiceHandle::from_raw(handle)) {
        (Some(ctx), Some(handle)) => {
            ctx.render(handle, left, right);
        }
        _ => {
            left.fill(0.0);
            right.fill(0.0);
        }
    }
}

/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`].
#[no_mangle]
pub unsafe extern "C" fn tv_set_param(ctx: *mut Context, handle: i32, param_id: i32, value: f32) {
    let Ok(param_id) = u32::try_from(param_id) else {
        return;
    };
    if let (Some(ctx), Some(handle)) = (ctx.as_mut(), VoiceHandle::from_raw(handle)) {
        ctx.set_param(handle, param_id, value);
    }
}

/// Returns the normalised value, or `-1.0` when it is unavailable.
///
/// # Safety
///
/// `ctx` must be null or a live pointer from [`tv_init`].
#[no_mangle]
pub unsafe extern "C" fn tv_get_param(ctx: *const Context, handle: i32, param_id: i32) -> f32 {
    let (Some(ctx), Some(handle), Ok(param_id)) = (
        ctx.as_ref(),
        VoiceHandle::from_raw(handle),
        u32::try_from(param_id),
    ) else {
        return -1.0;
    };
    ctx.get_param(handle, param_id).unwrap_or(-1.0)
}

fn clamp_midi(value: i32) -> u8 {
    value.clamp(0, 127) as u8
}
