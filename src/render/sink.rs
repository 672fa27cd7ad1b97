use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 渲染结果的去处
pub trait InvoiceSink {
    /// 写入一个文件，返回其位置；同名文件直接覆盖
    fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// 写到输出目录
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// 目录不存在时创建
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl InvoiceSink for DirectorySink {
    fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.root.join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// 内存收集，测试用
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: IndexMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.files.get(file_name).map(Vec::as_slice)
    }
}

impl InvoiceSink for MemorySink {
    fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files.insert(file_name.to_string(), bytes.to_vec());
        Ok(PathBuf::from(file_name))
    }
}
