// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod frame;

pub use frame::{Frame, FrameError, FrameFormat};
