//! 文档树模型
//!
//! 解析后的 QTI 文档：版本标签 + 通用嵌套树。
//! 子节点按元素名分组，可重复的元素（见 `ParseOptions::list_elements`）
//! 始终以列表形式保存，下游遍历只通过 `children()` 取切片。

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt::Display;

/// QTI 规范版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// QTI 1.2（旧版，questestinterop）
    #[serde(rename = "1.2")]
    V1_2,
    /// QTI 2.1（assessmentTest / assessmentItem）
    #[serde(rename = "2.1")]
    V2_1,
}

impl SchemaVersion {
    /// 获取展示名称
    pub fn label(self) -> &'static str {
        match self {
            SchemaVersion::V1_2 => "QTI 1.2",
            SchemaVersion::V2_1 => "QTI 2.1",
        }
    }

    pub fn is_legacy(self) -> bool {
        self == SchemaVersion::V1_2
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 同名子元素分组
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Single(XmlNode),
    List(Vec<XmlNode>),
}

/// 一组同名子元素
#[derive(Debug, Clone, PartialEq)]
pub struct ChildGroup {
    pub name: String,
    pub value: XmlValue,
}

impl ChildGroup {
    /// 以切片形式访问，不区分单个还是多个
    pub fn nodes(&self) -> &[XmlNode] {
        match &self.value {
            XmlValue::Single(node) => std::slice::from_ref(node),
            XmlValue::List(nodes) => nodes.as_slice(),
        }
    }
}

/// 通用 XML 节点
///
/// 遍历、序列化和析构都使用显式栈，嵌套深度不受线程栈大小限制
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// 元素本地名（去掉命名空间前缀）
    pub name: String,
    /// 属性（限定名 → 反转义后的值）
    pub attributes: BTreeMap<String, String>,
    /// 直接文本内容（多段拼接）
    pub text: String,
    children: Vec<ChildGroup>,
    /// 子元素的文档顺序（每项为所属分组的下标）
    child_order: Vec<usize>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            child_order: Vec::new(),
        }
    }

    /// 空树（格式错误的文档使用）
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// 读取属性，先按限定名查找，再按本地名查找
    pub fn attr(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.attributes.get(key) {
            return Some(value.as_str());
        }
        self.attributes
            .iter()
            .find(|(name, _)| name.rsplit(':').next() == Some(key))
            .map(|(_, value)| value.as_str())
    }

    /// 指定名字的所有子元素
    pub fn children(&self, name: &str) -> &[XmlNode] {
        self.children
            .iter()
            .find(|group| group.name == name)
            .map(ChildGroup::nodes)
            .unwrap_or(&[])
    }

    /// 指定名字的第一个子元素
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children(name).first()
    }

    pub fn has_child(&self, name: &str) -> bool {
        !self.children(name).is_empty()
    }

    /// 按首次出现顺序遍历子元素分组
    pub fn groups(&self) -> impl Iterator<Item = &ChildGroup> {
        self.children.iter()
    }

    /// 按文档顺序列出所有子元素（不区分分组）
    pub fn ordered_children(&self) -> Vec<&XmlNode> {
        let mut cursors = vec![0usize; self.children.len()];
        let mut out = Vec::with_capacity(self.child_order.len());
        for &group_index in &self.child_order {
            let Some(group) = self.children.get(group_index) else {
                continue;
            };
            if let Some(node) = group.nodes().get(cursors[group_index]) {
                out.push(node);
            }
            cursors[group_index] += 1;
        }
        out
    }

    /// 深度优先（先序）查找第一个同名后代
    pub fn find_descendant(&self, name: &str) -> Option<&XmlNode> {
        let mut stack: Vec<&XmlNode> = self.ordered_children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.name == name {
                return Some(node);
            }
            stack.extend(node.ordered_children().into_iter().rev());
        }
        None
    }

    /// 挂载子元素
    ///
    /// `list_elements` 中的元素名即使只出现一次也保存为列表
    pub(crate) fn push_child(&mut self, node: XmlNode, list_elements: &[&str]) {
        if let Some(index) = self.children.iter().position(|g| g.name == node.name) {
            let group = &mut self.children[index];
            let previous = std::mem::replace(&mut group.value, XmlValue::List(Vec::new()));
            group.value = match previous {
                XmlValue::Single(first) => XmlValue::List(vec![first, node]),
                XmlValue::List(mut nodes) => {
                    nodes.push(node);
                    XmlValue::List(nodes)
                }
            };
            self.child_order.push(index);
            return;
        }

        let name = node.name.clone();
        let value = if list_elements.contains(&name.as_str()) {
            XmlValue::List(vec![node])
        } else {
            XmlValue::Single(node)
        };
        self.child_order.push(self.children.len());
        self.children.push(ChildGroup { name, value });
    }

    /// 重新序列化为标记文本
    ///
    /// 子元素按文档顺序输出；文本先于子元素输出，混合内容的交错顺序不保留
    pub fn to_markup(&self) -> String {
        enum Step<'a> {
            Open(&'a XmlNode),
            Close(&'a str),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Open(self)];

        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Close(name) => {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                    continue;
                }
                Step::Open(node) => node,
            };

            out.push('<');
            out.push_str(&node.name);
            for (key, value) in &node.attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }

            if node.text.is_empty() && node.children.is_empty() {
                out.push_str("/>");
                continue;
            }

            out.push('>');
            out.push_str(&escape(node.text.as_str()));
            stack.push(Step::Close(&node.name));
            stack.extend(node.ordered_children().into_iter().rev().map(Step::Open));
        }

        out
    }

    /// 转为通用 JSON 结构
    ///
    /// 属性以 `@` 前缀保存，文本为 `#text`，列表分组输出为数组
    pub fn to_json(&self) -> JsonValue {
        // 按层序编号，再从最深的节点开始组装，子节点总在父节点之前完成
        let mut nodes: Vec<&XmlNode> = vec![self];
        let mut child_slots: Vec<Vec<Vec<usize>>> = Vec::new();
        let mut next = 0;
        while next < nodes.len() {
            let node = nodes[next];
            let mut slots = Vec::with_capacity(node.children.len());
            for group in &node.children {
                let mut indices = Vec::with_capacity(group.nodes().len());
                for child in group.nodes() {
                    indices.push(nodes.len());
                    nodes.push(child);
                }
                slots.push(indices);
            }
            child_slots.push(slots);
            next += 1;
        }

        let mut built: Vec<Option<JsonValue>> = vec![None; nodes.len()];
        for index in (0..nodes.len()).rev() {
            let node = nodes[index];
            let mut map = Map::new();
            for (key, value) in &node.attributes {
                map.insert(format!("@{}", key), JsonValue::String(value.clone()));
            }
            if !node.text.is_empty() {
                map.insert("#text".to_string(), JsonValue::String(node.text.clone()));
            }
            for (group, indices) in node.children.iter().zip(&child_slots[index]) {
                let mut values = indices
                    .iter()
                    .map(|&i| built[i].take().unwrap_or(JsonValue::Null));
                let value = match &group.value {
                    XmlValue::Single(_) => values.next().unwrap_or(JsonValue::Null),
                    XmlValue::List(_) => JsonValue::Array(values.collect()),
                };
                map.insert(group.name.clone(), value);
            }
            built[index] = Some(JsonValue::Object(map));
        }

        built
            .first_mut()
            .and_then(Option::take)
            .unwrap_or(JsonValue::Null)
    }
}

impl Drop for XmlNode {
    fn drop(&mut self) {
        // 逐层拆开子树，避免默认析构逐层递归
        let mut pending: Vec<XmlNode> = Vec::new();
        for group in self.children.drain(..) {
            match group.value {
                XmlValue::Single(node) => pending.push(node),
                XmlValue::List(nodes) => pending.extend(nodes),
            }
        }
        while let Some(mut node) = pending.pop() {
            for group in node.children.drain(..) {
                match group.value {
                    XmlValue::Single(child) => pending.push(child),
                    XmlValue::List(children) => pending.extend(children),
                }
            }
        }
    }
}

/// 解析后的文档
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub schema_version: SchemaVersion,
    /// 根节点
    pub tree: XmlNode,
    pub well_formed: bool,
    pub parse_errors: Vec<String>,
}

impl ParsedDocument {
    pub fn root_name(&self) -> &str {
        &self.tree.name
    }
}
