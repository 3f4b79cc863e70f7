//! The built-in class library: packages and the classes they export.
//!
//! Only names are known. Members of library classes are never looked up, so
//! anything a source type might inherit from a library supertype is assumed
//! to exist.

/// Packages and their classes. Nested classes are written `Outer.Inner`.
const LIBRARY: &[(&str, &[&str])] = &[
    (
        "java.lang",
        &[
            "Object", "String", "StringBuilder", "StringBuffer", "CharSequence", "Character",
            "Boolean", "Byte", "Short", "Integer", "Long", "Float", "Double", "Number", "Void",
            "Math", "StrictMath", "System", "Runtime", "Thread", "Thread.State", "Runnable",
            "Iterable", "Comparable", "Cloneable", "AutoCloseable", "Class", "ClassLoader",
            "Enum", "Record", "Throwable", "Exception", "Error", "RuntimeException",
            "IllegalArgumentException", "IllegalStateException", "NullPointerException",
            "UnsupportedOperationException", "IndexOutOfBoundsException",
            "ArrayIndexOutOfBoundsException", "StringIndexOutOfBoundsException",
            "ArithmeticException", "ClassCastException", "NumberFormatException",
            "InterruptedException", "CloneNotSupportedException", "ClassNotFoundException",
            "ReflectiveOperationException", "SecurityException", "AssertionError",
            "StackOverflowError", "OutOfMemoryError", "Override", "Deprecated",
            "SuppressWarnings", "FunctionalInterface", "SafeVarargs",
        ],
    ),
    (
        "java.lang.annotation",
        &[
            "Annotation", "Documented", "ElementType", "Inherited", "Retention",
            "RetentionPolicy", "Target", "Repeatable",
        ],
    ),
    (
        "java.lang.reflect",
        &["Method", "Field", "Constructor", "Modifier", "Array", "Type"],
    ),
    (
        "java.util",
        &[
            "Collection", "List", "ArrayList", "LinkedList", "Map", "Map.Entry", "HashMap",
            "LinkedHashMap", "TreeMap", "SortedMap", "NavigableMap", "Set", "HashSet",
            "LinkedHashSet", "TreeSet", "SortedSet", "NavigableSet", "Queue", "Deque",
            "ArrayDeque", "PriorityQueue", "Stack", "Vector", "Iterator", "ListIterator",
            "Collections", "Arrays", "Objects", "Optional", "OptionalInt", "OptionalLong",
            "OptionalDouble", "Comparator", "Random", "Scanner", "StringJoiner", "UUID",
            "Locale", "Properties", "EnumSet", "EnumMap", "BitSet", "Date", "Calendar",
            "NoSuchElementException", "ConcurrentModificationException",
        ],
    ),
    (
        "java.util.function",
        &[
            "Function", "BiFunction", "Supplier", "Consumer", "BiConsumer", "Predicate",
            "BiPredicate", "UnaryOperator", "BinaryOperator", "IntFunction", "ToIntFunction",
            "IntPredicate", "IntUnaryOperator", "IntBinaryOperator", "BooleanSupplier",
        ],
    ),
    (
        "java.util.concurrent",
        &[
            "ConcurrentHashMap", "ConcurrentMap", "CopyOnWriteArrayList", "ExecutorService",
            "Executors", "Executor", "Future", "CompletableFuture", "Callable", "TimeUnit",
            "CountDownLatch", "ExecutionException", "TimeoutException",
        ],
    ),
    (
        "java.util.concurrent.atomic",
        &["AtomicInteger", "AtomicLong", "AtomicBoolean", "AtomicReference"],
    ),
    (
        "java.util.stream",
        &["Stream", "IntStream", "LongStream", "Collectors", "Collector"],
    ),
    (
        "java.io",
        &[
            "Serializable", "Closeable", "IOException", "UncheckedIOException",
            "FileNotFoundException", "File", "InputStream", "OutputStream", "PrintStream",
            "PrintWriter", "Reader", "Writer", "StringReader", "StringWriter",
            "BufferedReader", "BufferedWriter", "InputStreamReader",
        ],
    ),
    ("java.math", &["BigInteger", "BigDecimal", "RoundingMode"]),
    (
        "java.nio.file",
        &["Path", "Paths", "Files", "StandardOpenOption"],
    ),
    ("java.nio.charset", &["Charset", "StandardCharsets"]),
    ("javax.annotation", &["Generated", "Nullable"]),
    (
        "javax.annotation.processing",
        &[
            "Processor", "AbstractProcessor", "ProcessingEnvironment", "RoundEnvironment",
            "Filer", "Messager", "Generated", "SupportedAnnotationTypes",
            "SupportedSourceVersion", "SupportedOptions",
        ],
    ),
];

/// Whether `package` is a library package or a prefix of one (`java`).
pub(crate) fn package_exists(package: &str) -> bool {
    LIBRARY.iter().any(|(name, _)| {
        *name == package
            || (name.starts_with(package) && name.as_bytes().get(package.len()) == Some(&b'.'))
    })
}

/// Whether `package` exports class `name` (`Entry` nested as `Map.Entry`).
pub(crate) fn class_exists(package: &str, name: &str) -> bool {
    LIBRARY
        .iter()
        .any(|(pkg, classes)| *pkg == package && classes.contains(&name))
}

/// Whether the dotted name denotes a library class, trying every split into
/// package and class path.
pub(crate) fn qualified_class_exists(segments: &[String]) -> bool {
    (1..segments.len()).any(|split| {
        class_exists(&segments[..split].join("."), &segments[split..].join("."))
    })
}

/// `java.lang` classes are visible everywhere without an import.
pub(crate) fn implicit_class(name: &str) -> bool {
    class_exists("java.lang", name)
}

/// Methods every class inherits from `Object`.
pub(crate) const OBJECT_METHODS: &[&str] = &[
    "equals", "hashCode", "toString", "getClass", "notify", "notifyAll", "wait", "clone",
    "finalize",
];

/// Methods every enum inherits from `Enum`, including the synthetic ones.
pub(crate) const ENUM_METHODS: &[&str] = &[
    "values", "valueOf", "name", "ordinal", "compareTo", "getDeclaringClass",
];
