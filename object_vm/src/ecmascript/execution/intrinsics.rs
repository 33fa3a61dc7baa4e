// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-agent intrinsic objects and predefined identifiers. Both are created
//! on first use and live as long as the [`Agent`].

use super::{Agent, ExceptionType, JsResult};
use crate::{
    ecmascript::{
        builtins::{
            accessor::Accessor,
            array::array_create_with_prototype,
            builtin_function::{Behaviour, create_builtin_function},
            ordinary::{add_own_property, object_create_with_kind},
        },
        types::{
            ArgumentsList, Function, Object, ObjectKind, PropertyFlags, PropertyKey,
            PropertyValue, String, Value,
        },
    },
    engine::context::GcScope,
    heap::{HeapMarkAndSweep, WorkQueues},
};

#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    pub object_prototype: Object,
    pub function_prototype: Object,
    pub array_prototype: Object,
    pub error_prototype: Object,
    pub eval_error_prototype: Object,
    pub range_error_prototype: Object,
    pub reference_error_prototype: Object,
    pub syntax_error_prototype: Object,
    pub type_error_prototype: Object,
    pub uri_error_prototype: Object,
    /// ### [10.2.4.1 %ThrowTypeError% ( )](https://tc39.es/ecma262/#sec-%throwtypeerror%)
    pub throw_type_error: Function,
    /// Shared `{ get: %ThrowTypeError%, set: %ThrowTypeError% }` pair used by
    /// strict arguments objects.
    pub(crate) throw_type_error_accessor: Accessor,
}

impl Intrinsics {
    pub(crate) fn create(agent: &mut Agent) -> Self {
        let object_prototype = object_create_with_kind(agent, None, ObjectKind::Ordinary);
        let function_prototype =
            object_create_with_kind(agent, Some(object_prototype), ObjectKind::Ordinary);
        let array_prototype = array_create_with_prototype(agent, 0, Some(object_prototype));

        let error_prototype = create_error_prototype(agent, object_prototype, ExceptionType::Error);
        let mut derived = |kind| create_error_prototype(agent, error_prototype, kind);
        let eval_error_prototype = derived(ExceptionType::EvalError);
        let range_error_prototype = derived(ExceptionType::RangeError);
        let reference_error_prototype = derived(ExceptionType::ReferenceError);
        let syntax_error_prototype = derived(ExceptionType::SyntaxError);
        let type_error_prototype = derived(ExceptionType::TypeError);
        let uri_error_prototype = derived(ExceptionType::UriError);

        let throw_type_error = create_builtin_function(
            agent,
            Behaviour::Regular(throw_type_error),
            0,
            "",
            Some(function_prototype),
        );
        agent[throw_type_error.into_object()].set_extensible(false);
        let throw_type_error_accessor =
            Accessor::create(agent, Some(throw_type_error), Some(throw_type_error));

        Self {
            object_prototype,
            function_prototype,
            array_prototype: array_prototype.into_object(),
            error_prototype,
            eval_error_prototype,
            range_error_prototype,
            reference_error_prototype,
            syntax_error_prototype,
            type_error_prototype,
            uri_error_prototype,
            throw_type_error,
            throw_type_error_accessor,
        }
    }

    pub fn error_prototype(&self, kind: ExceptionType) -> Object {
        match kind {
            ExceptionType::Error => self.error_prototype,
            ExceptionType::EvalError => self.eval_error_prototype,
            ExceptionType::RangeError => self.range_error_prototype,
            ExceptionType::ReferenceError => self.reference_error_prototype,
            ExceptionType::SyntaxError => self.syntax_error_prototype,
            ExceptionType::TypeError => self.type_error_prototype,
            ExceptionType::UriError => self.uri_error_prototype,
        }
    }
}

fn create_error_prototype(agent: &mut Agent, prototype: Object, kind: ExceptionType) -> Object {
    let object = object_create_with_kind(agent, Some(prototype), ObjectKind::Ordinary);
    let name = String::from_str(agent, kind.name());
    let key = PropertyKey::String(agent.predefined().name);
    add_own_property(
        agent,
        object,
        key,
        PropertyFlags::WRITABLE | PropertyFlags::CONFIGURABLE,
        PropertyValue::Data(Value::String(name)),
    );
    object
}

fn throw_type_error(
    agent: &mut Agent,
    _this: Value,
    _arguments: ArgumentsList,
    gc: GcScope,
) -> JsResult<Value> {
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Restricted in strict mode",
        gc.nogc(),
    ))
}

impl HeapMarkAndSweep for Intrinsics {
    fn mark_values(&self, queues: &mut WorkQueues) {
        let Self {
            object_prototype,
            function_prototype,
            array_prototype,
            error_prototype,
            eval_error_prototype,
            range_error_prototype,
            reference_error_prototype,
            syntax_error_prototype,
            type_error_prototype,
            uri_error_prototype,
            throw_type_error,
            throw_type_error_accessor,
        } = self;
        for object in [
            object_prototype,
            function_prototype,
            array_prototype,
            error_prototype,
            eval_error_prototype,
            range_error_prototype,
            reference_error_prototype,
            syntax_error_prototype,
            type_error_prototype,
            uri_error_prototype,
        ] {
            queues.objects.push(*object);
        }
        queues.objects.push(throw_type_error.into_object());
        queues.accessors.push(*throw_type_error_accessor);
    }
}

macro_rules! predefined_strings {
    ($($field: ident => $text: literal,)*) => {
        /// Identifiers used by the object model itself, interned once per
        /// agent.
        #[derive(Debug, Clone, Copy)]
        pub struct PredefinedStrings {
            $(pub $field: String,)*
        }

        impl PredefinedStrings {
            pub(crate) fn create(agent: &mut Agent) -> Self {
                Self {
                    $($field: String::from_str(agent, $text),)*
                }
            }
        }

        impl HeapMarkAndSweep for PredefinedStrings {
            fn mark_values(&self, queues: &mut WorkQueues) {
                $(queues.strings.push(self.$field);)*
            }
        }
    };
}

predefined_strings! {
    apply => "apply",
    callee => "callee",
    caller => "caller",
    configurable => "configurable",
    construct => "construct",
    define_property => "defineProperty",
    delete_property => "deleteProperty",
    enumerable => "enumerable",
    get => "get",
    get_own_property_descriptor => "getOwnPropertyDescriptor",
    get_prototype_of => "getPrototypeOf",
    has => "has",
    is_extensible => "isExtensible",
    length => "length",
    message => "message",
    name => "name",
    own_keys => "ownKeys",
    prevent_extensions => "preventExtensions",
    proxy => "proxy",
    revoke => "revoke",
    set => "set",
    set_prototype_of => "setPrototypeOf",
    to_string => "toString",
    value => "value",
    value_of => "valueOf",
    writable => "writable",
}
