//! Transport-level error codes carried in [`CallOutcome::error_code`].
//!
//! `0` means the transport delivered the request and received a response.
//! System errno values are used for socket failures; framework codes start
//! at 1001.
//!
//! [`CallOutcome::error_code`]: crate::response::CallOutcome::error_code

/// The attempt completed at the transport level.
pub const OK: i32 = 0;

pub const ENOENT: i32 = 2;
pub const EPIPE: i32 = 32;
pub const ENODATA: i32 = 61;
pub const ECONNRESET: i32 = 104;
/// Connect timeout (not the per-call deadline, see [`ERPCTIMEDOUT`]).
pub const ETIMEDOUT: i32 = 110;
pub const ECONNREFUSED: i32 = 111;
pub const EHOSTDOWN: i32 = 112;

/// No such service.
pub const ENOSERVICE: i32 = 1001;
/// No such method.
pub const ENOMETHOD: i32 = 1002;
/// Bad request.
pub const EREQUEST: i32 = 1003;
/// Credential missing or rejected by the server.
pub const ERPCAUTH: i32 = 1004;
/// Call deadline exceeded.
pub const ERPCTIMEDOUT: i32 = 1008;
/// Broken socket.
pub const EFAILEDSOCKET: i32 = 1009;
/// Server is overcrowded.
pub const EOVERCROWDED: i32 = 1011;
/// Stream ids of a multiplexed connection ran out.
pub const EH2RUNOUTSTREAMS: i32 = 1017;
/// Unexpected end of stream.
pub const EEOF: i32 = 1014;
/// Server is stopping.
pub const ELOGOFF: i32 = 2003;
/// Server reached its concurrency limit.
pub const ELIMIT: i32 = 2004;

/// Human-readable name of a transport code, for log fields.
pub fn describe(code: i32) -> &'static str {
    match code {
        OK => "ok",
        ENOENT => "ENOENT",
        EPIPE => "EPIPE",
        ENODATA => "ENODATA",
        ECONNRESET => "ECONNRESET",
        ETIMEDOUT => "ETIMEDOUT",
        ECONNREFUSED => "ECONNREFUSED",
        EHOSTDOWN => "EHOSTDOWN",
        ENOSERVICE => "ENOSERVICE",
        ENOMETHOD => "ENOMETHOD",
        EREQUEST => "EREQUEST",
        ERPCAUTH => "ERPCAUTH",
        ERPCTIMEDOUT => "ERPCTIMEDOUT",
        EFAILEDSOCKET => "EFAILEDSOCKET",
        EOVERCROWDED => "EOVERCROWDED",
        EH2RUNOUTSTREAMS => "EH2RUNOUTSTREAMS",
        EEOF => "EEOF",
        ELOGOFF => "ELOGOFF",
        ELIMIT => "ELIMIT",
        _ => "unknown",
    }
}
