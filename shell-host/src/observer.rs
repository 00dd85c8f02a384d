//! 视图观察者
//!
//! 驱动器每次视图变化时通知所有观察者。终端前端用它重绘，测试用它记录视图序列。

use std::cell::RefCell;
use std::rc::Rc;

use shell_runtime::View;

/// 视图观察者
pub trait ViewObserver {
    fn on_view(&mut self, view: &View);
}

impl<F> ViewObserver for F
where
    F: FnMut(&View),
{
    fn on_view(&mut self, view: &View) {
        self(view)
    }
}

/// 记录全部视图的观察者
///
/// 克隆后共享同一份记录，注册一份给驱动器，保留一份读取。
#[derive(Debug, Clone, Default)]
pub struct ViewHistory {
    views: Rc<RefCell<Vec<View>>>,
}

impl ViewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按发布顺序返回全部视图
    pub fn views(&self) -> Vec<View> {
        self.views.borrow().clone()
    }

    pub fn last(&self) -> Option<View> {
        self.views.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.borrow().is_empty()
    }
}

impl ViewObserver for ViewHistory {
    fn on_view(&mut self, view: &View) {
        self.views.borrow_mut().push(view.clone());
    }
}
