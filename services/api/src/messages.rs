//! services/api/src/messages.rs
//!
//! User-facing messages, in Indonesian as shown by the verification form.

pub const LOGIN_FAILED: &str =
    "Data login tidak ditemukan. Periksa kembali nomor HP dan tanggal lahir Anda.";
pub const UPLOAD_FAILED: &str = "Gagal mengunggah file. Silakan coba lagi.";
pub const SAVE_FAILED: &str = "Gagal menyimpan data. Silakan coba lagi.";
pub const INVALID_FILE_TYPE: &str = "Tipe file tidak didukung. Gunakan JPG, PNG, atau PDF.";
pub const NETWORK_ERROR: &str = "Koneksi internet bermasalah. Silakan coba lagi.";
pub const NIK_INVALID: &str = "NIK harus terdiri dari 16 digit angka.";
pub const PHONE_INVALID: &str = "Format nomor HP tidak valid.";
pub const DATE_INVALID: &str = "Format tanggal tidak valid. Gunakan DD/MM/YYYY.";
pub const FILES_REQUIRED: &str = "Harap upload semua file yang diperlukan.";
pub const UPLOAD_NOT_CONFIGURED: &str = "Fitur upload file belum dikonfigurasi. Silakan hubungi administrator untuk melengkapi konfigurasi OAuth2 Client ID dan Google Drive Folder ID.";
pub const AUTH_FAILED: &str = "Gagal melakukan autentikasi untuk upload file.";
pub const ALREADY_COMPLETED: &str = "Data Anda sudah lengkap.";
pub const SUBMISSION_IN_PROGRESS: &str = "Data Anda sedang diproses. Silakan tunggu.";
pub const SESSION_REQUIRED: &str = "Sesi tidak ditemukan. Silakan login kembali.";
pub const TOKEN_INVALID: &str = "Kode QR tidak valid.";
pub const SUCCESS_SAVE: &str = "Data berhasil disimpan!";
pub const SUCCESS_LOGIN: &str = "Login berhasil!";
pub const SUCCESS_LOGOUT: &str = "Anda telah keluar.";

/// `File terlalu besar. Maksimal 5MB.`
pub fn file_too_large(limit: &str) -> String {
    format!("File terlalu besar. Maksimal {}.", limit)
}
