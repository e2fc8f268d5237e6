//! 视图模型的状态容器
//!
//! 状态放在 `RefCell` 里，每次修改后把快照推送给订阅者（界面层把快照写入
//! 自己的响应式信号）。异步操作完成时先检查视图是否仍挂载、加载是否仍是
//! 最新一次，过期的结果直接丢弃。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listener<S> = Rc<dyn Fn(&S)>;

pub struct ViewState<S> {
    state: RefCell<S>,
    listeners: RefCell<Vec<Listener<S>>>,
    mounted: Cell<bool>,
    generation: Cell<u64>,
}

/// 一次加载的代号，用来识别被后续加载取代的响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl<S: Clone> ViewState<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: RefCell::new(initial),
            listeners: RefCell::new(Vec::new()),
            mounted: Cell::new(true),
            generation: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    /// 修改状态并通知订阅者；卸载后调用不产生任何效果
    pub fn update(&self, f: impl FnOnce(&mut S)) -> bool {
        if !self.mounted.get() {
            return false;
        }
        f(&mut self.state.borrow_mut());
        let snapshot = self.snapshot();
        let listeners: Vec<Listener<S>> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
        true
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// 卸载：之后到达的结果全部忽略，订阅者被释放
    pub fn unmount(&self) {
        self.mounted.set(false);
        self.listeners.borrow_mut().clear();
    }

    /// 开始一次新的加载，之前发出的加载随之过期
    pub fn begin_load(&self) -> LoadTicket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        LoadTicket(next)
    }

    /// 当前代号，不开始新的加载
    pub fn ticket(&self) -> LoadTicket {
        LoadTicket(self.generation.get())
    }

    /// 该加载的结果是否仍应被采用
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.mounted.get() && self.generation.get() == ticket.0
    }
}
