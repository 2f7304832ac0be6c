// python/src/lib.rs
//! Python bindings for fastsegy using PyO3

use pyo3::prelude::*;
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyIOError, PyIndexError, PyValueError};
use pyo3::types::{PyAny, PyDict, PyModule};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyArrayMethods};
use std::sync::Arc;

// Re-export the main library
use fastsegy as segy;

create_exception!(_fastsegy, FormatError, PyException, "The file is not a readable SEG-Y file.");
create_exception!(_fastsegy, UnsupportedByteOrderError, FormatError, "Neither byte order yields a plausible binary header.");
create_exception!(_fastsegy, IndexOutOfRangeError, PyIndexError, "Trace number or range outside 1..=trace_count.");
create_exception!(_fastsegy, ClosedFileError, PyValueError, "Operation on a closed SEG-Y file.");

fn segy_error_to_pyerr(err: segy::SegyError) -> PyErr {
    let message = err.to_string();
    match err.kind() {
        segy::ErrorKind::Io => PyIOError::new_err(message),
        segy::ErrorKind::Format | segy::ErrorKind::UnsupportedFormat => FormatError::new_err(message),
        segy::ErrorKind::UnsupportedByteOrder => UnsupportedByteOrderError::new_err(message),
        segy::ErrorKind::IndexOutOfRange => IndexOutOfRangeError::new_err(message),
        segy::ErrorKind::Closed => ClosedFileError::new_err(message),
    }
}

fn metadata_to_dict<'py>(py: Python<'py>, metadata: &segy::MetadataSnapshot) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (key, value) in metadata.entries() {
        match value {
            segy::MetadataValue::Int(v) => dict.set_item(key, v)?,
            segy::MetadataValue::Float(v) => dict.set_item(key, v)?,
            segy::MetadataValue::Text(v) => dict.set_item(key, v)?,
        }
    }
    Ok(dict)
}

fn trace_header_to_dict<'py>(py: Python<'py>, header: &segy::TraceHeader) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("sequence_in_line", header.sequence_in_line)?;
    dict.set_item("sequence_in_file", header.sequence_in_file)?;
    dict.set_item("field_record", header.field_record)?;
    dict.set_item("trace_in_field_record", header.trace_in_field_record)?;
    dict.set_item("trace_id_code", header.trace_id_code)?;
    dict.set_item("elevation_scalar", header.elevation_scalar)?;
    dict.set_item("coordinate_scalar", header.coordinate_scalar)?;
    dict.set_item("source_x", header.source_x)?;
    dict.set_item("source_y", header.source_y)?;
    dict.set_item("group_x", header.group_x)?;
    dict.set_item("group_y", header.group_y)?;
    dict.set_item("delay_recording_time", header.delay_recording_time)?;
    dict.set_item("sample_count", header.sample_count)?;
    dict.set_item("sample_interval", header.sample_interval)?;
    Ok(dict)
}

fn matrix_to_array<'py>(py: Python<'py>, matrix: segy::TraceMatrix) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let (rows, samples) = matrix.shape();
    matrix.into_vec().into_pyarray(py).reshape([rows, samples])
}

/// SEG-Y file handle with random access to traces
#[pyclass(name = "SegyFile")]
pub struct PySegyFile {
    inner: Arc<segy::SegyFile>,
}

#[pymethods]
impl PySegyFile {
    #[new]
    #[pyo3(signature = (path, mmap = false))]
    fn new(py: Python<'_>, path: &str, mmap: bool) -> PyResult<Self> {
        let path = path.to_string();
        let file = py
            .detach(move || open_file(&path, mmap))
            .map_err(segy_error_to_pyerr)?;
        Ok(PySegyFile { inner: Arc::new(file) })
    }

    /// Textual header as 40 lines joined with newlines
    fn get_header(&self) -> PyResult<String> {
        self.inner.get_header().map_err(segy_error_to_pyerr)
    }

    fn get_metadata<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let metadata = self.inner.get_metadata().map_err(segy_error_to_pyerr)?;
        metadata_to_dict(py, &metadata)
    }

    /// Samples of trace `n` (1-based)
    fn get_trace<'py>(&self, py: Python<'py>, n: u64) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let inner = Arc::clone(&self.inner);
        let data = py.detach(move || inner.get_trace(n)).map_err(segy_error_to_pyerr)?;
        Ok(data.into_pyarray(py))
    }

    /// Traces `start..=end` as a 2-D array, one row per trace
    fn get_trace_range<'py>(&self, py: Python<'py>, start: u64, end: u64) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let inner = Arc::clone(&self.inner);
        let matrix = py
            .detach(move || inner.get_trace_range(start, end))
            .map_err(segy_error_to_pyerr)?;
        matrix_to_array(py, matrix)
    }

    fn get_trace_header<'py>(&self, py: Python<'py>, n: u64) -> PyResult<Bound<'py, PyDict>> {
        let inner = Arc::clone(&self.inner);
        let header = py
            .detach(move || inner.get_trace_header(n))
            .map_err(segy_error_to_pyerr)?;
        trace_header_to_dict(py, &header)
    }

    #[getter]
    fn trace_count(&self) -> PyResult<u64> {
        if self.inner.is_closed() {
            return Err(ClosedFileError::new_err("File is closed"));
        }
        Ok(self.inner.trace_count())
    }

    #[getter]
    fn closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn close(&self) {
        self.inner.close();
    }

    fn __enter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    fn __exit__(&self, _exc_type: Option<&Bound<'_, PyAny>>, _exc_value: Option<&Bound<'_, PyAny>>, _traceback: Option<&Bound<'_, PyAny>>) -> PyResult<bool> {
        self.close();
        Ok(false)
    }

    fn __repr__(&self) -> String {
        match self.inner.path() {
            Some(path) => format!("SegyFile('{}', traces={})", path.display(), self.inner.trace_count()),
            None => format!("SegyFile(<memory>, traces={})", self.inner.trace_count()),
        }
    }
}

fn open_file(path: &str, mmap: bool) -> segy::Result<segy::SegyFile> {
    if mmap {
        segy::SegyFile::open_mmap(path)
    } else {
        segy::SegyFile::open(path)
    }
}

fn open_path(py: Python<'_>, path: &str) -> PyResult<segy::SegyFile> {
    let path = path.to_string();
    py.detach(move || segy::SegyFile::open(path)).map_err(segy_error_to_pyerr)
}

/// Textual header of the file at `path`
#[pyfunction]
fn get_header(py: Python<'_>, path: &str) -> PyResult<String> {
    open_path(py, path)?.get_header().map_err(segy_error_to_pyerr)
}

#[pyfunction]
fn get_metadata<'py>(py: Python<'py>, path: &str) -> PyResult<Bound<'py, PyDict>> {
    let metadata = open_path(py, path)?.get_metadata().map_err(segy_error_to_pyerr)?;
    metadata_to_dict(py, &metadata)
}

#[pyfunction]
fn get_trace<'py>(py: Python<'py>, path: &str, n: u64) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let file = open_path(py, path)?;
    let data = py.detach(move || file.get_trace(n)).map_err(segy_error_to_pyerr)?;
    Ok(data.into_pyarray(py))
}

#[pyfunction]
fn get_trace_range<'py>(py: Python<'py>, path: &str, start: u64, end: u64) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let file = open_path(py, path)?;
    let matrix = py
        .detach(move || file.get_trace_range(start, end))
        .map_err(segy_error_to_pyerr)?;
    matrix_to_array(py, matrix)
}

/// Python module for SEG-Y trace access
#[pymodule]
fn _fastsegy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_class::<PySegyFile>()?;
    m.add_function(wrap_pyfunction!(get_header, m)?)?;
    m.add_function(wrap_pyfunction!(get_metadata, m)?)?;
    m.add_function(wrap_pyfunction!(get_trace, m)?)?;
    m.add_function(wrap_pyfunction!(get_trace_range, m)?)?;

    m.add("FormatError", py.get_type::<FormatError>())?;
    m.add("UnsupportedByteOrderError", py.get_type::<UnsupportedByteOrderError>())?;
    m.add("IndexOutOfRangeError", py.get_type::<IndexOutOfRangeError>())?;
    m.add("ClosedFileError", py.get_type::<ClosedFileError>())?;

    m.add("RECOMMENDED_MAX_RANGE", segy::RECOMMENDED_MAX_RANGE)?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
